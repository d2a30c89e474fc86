//! The spreadsheet model the grid draws from.
//!
//! The grid never owns sheet data. It asks a [`SheetModel`] for sizes, styles
//! and display text every frame, and only writes back at the end of a gesture
//! (resize, autofill, selection). Queries are made several times per visible
//! cell, so implementations should answer them in (amortized) constant time.

mod memory;

#[cfg(target_arch = "wasm32")]
mod js;

use std::borrow::Cow;

pub use memory::{MemoryCell, MemoryModel, MemorySheet};

#[cfg(target_arch = "wasm32")]
pub use js::JsModel;

use crate::error::Result;
use crate::types::{AutoFillArea, CellArea, CellStyle, CellType, SelectedView};

pub trait SheetModel {
    fn selected_sheet(&self) -> u32;

    /// Raw row height; the grid rounds it to whole pixels.
    fn row_height(&self, sheet: u32, row: u32) -> f64;
    /// Raw column width; the grid rounds it to whole pixels.
    fn column_width(&self, sheet: u32, column: u32) -> f64;
    fn frozen_rows_count(&self, sheet: u32) -> u32;
    fn frozen_columns_count(&self, sheet: u32) -> u32;
    fn show_grid_lines(&self, sheet: u32) -> bool;

    fn cell_style(&self, sheet: u32, row: u32, column: u32) -> Cow<'_, CellStyle>;
    fn cell_type(&self, sheet: u32, row: u32, column: u32) -> CellType;
    /// Display text for a cell; empty string for an empty cell.
    fn formatted_cell_value(&self, sheet: u32, row: u32, column: u32) -> String;

    fn selected_view(&self) -> SelectedView;

    /// Nearest non-empty column strictly left of `column` in `row`.
    fn last_non_empty_in_row_before_column(&self, sheet: u32, row: u32, column: u32)
        -> Option<u32>;
    /// Nearest non-empty column strictly right of `column` in `row`.
    fn first_non_empty_in_row_after_column(&self, sheet: u32, row: u32, column: u32)
        -> Option<u32>;
    /// Rows holding content in `column`, ascending.
    fn rows_with_data(&self, sheet: u32, column: u32) -> Vec<u32>;
    /// Columns holding content in `row`, ascending.
    fn columns_with_data(&self, sheet: u32, row: u32) -> Vec<u32>;

    fn set_rows_height(&mut self, sheet: u32, row_start: u32, row_end: u32, height: f64)
        -> Result<()>;
    fn set_columns_width(
        &mut self,
        sheet: u32,
        column_start: u32,
        column_end: u32,
        width: f64,
    ) -> Result<()>;
    /// Replicate `source` vertically until (and including) `to_row`.
    fn auto_fill_rows(&mut self, source: &AutoFillArea, to_row: u32) -> Result<()>;
    /// Replicate `source` horizontally until (and including) `to_column`.
    fn auto_fill_columns(&mut self, source: &AutoFillArea, to_column: u32) -> Result<()>;
    fn set_top_left_visible_cell(&mut self, row: u32, column: u32) -> Result<()>;
    fn set_selected_cell(&mut self, row: u32, column: u32) -> Result<()>;
    fn set_selected_range(&mut self, area: &CellArea) -> Result<()>;
}
