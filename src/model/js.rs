//! Binding for a model object living on the JavaScript side.
//!
//! The host passes any object with the camelCase methods below. Structured
//! payloads (styles, the selected view, autofill areas) cross the boundary
//! through `serde-wasm-bindgen`.

use std::borrow::Cow;

use wasm_bindgen::prelude::*;

use crate::error::{GridError, Result};
use crate::types::{AutoFillArea, CellArea, CellStyle, CellType, SelectedView};

use super::SheetModel;

#[wasm_bindgen]
extern "C" {
    /// A JS object implementing the spreadsheet model methods.
    pub type JsModel;

    #[wasm_bindgen(method, js_name = getSelectedSheet)]
    fn js_selected_sheet(this: &JsModel) -> u32;
    #[wasm_bindgen(method, js_name = getRowHeight)]
    fn js_row_height(this: &JsModel, sheet: u32, row: u32) -> f64;
    #[wasm_bindgen(method, js_name = getColumnWidth)]
    fn js_column_width(this: &JsModel, sheet: u32, column: u32) -> f64;
    #[wasm_bindgen(method, js_name = getFrozenRowsCount)]
    fn js_frozen_rows_count(this: &JsModel, sheet: u32) -> u32;
    #[wasm_bindgen(method, js_name = getFrozenColumnsCount)]
    fn js_frozen_columns_count(this: &JsModel, sheet: u32) -> u32;
    #[wasm_bindgen(method, js_name = getShowGridLines)]
    fn js_show_grid_lines(this: &JsModel, sheet: u32) -> bool;
    #[wasm_bindgen(method, js_name = getCellStyle)]
    fn js_cell_style(this: &JsModel, sheet: u32, row: u32, column: u32) -> JsValue;
    #[wasm_bindgen(method, js_name = getCellType)]
    fn js_cell_type(this: &JsModel, sheet: u32, row: u32, column: u32) -> u32;
    #[wasm_bindgen(method, js_name = getFormattedCellValue)]
    fn js_formatted_cell_value(this: &JsModel, sheet: u32, row: u32, column: u32) -> String;
    #[wasm_bindgen(method, js_name = getSelectedView)]
    fn js_selected_view(this: &JsModel) -> JsValue;
    #[wasm_bindgen(method, js_name = getLastNonEmptyInRowBeforeColumn)]
    fn js_last_non_empty_before(this: &JsModel, sheet: u32, row: u32, column: u32)
        -> Option<u32>;
    #[wasm_bindgen(method, js_name = getFirstNonEmptyInRowAfterColumn)]
    fn js_first_non_empty_after(this: &JsModel, sheet: u32, row: u32, column: u32)
        -> Option<u32>;
    #[wasm_bindgen(method, js_name = getRowsWithData)]
    fn js_rows_with_data(this: &JsModel, sheet: u32, column: u32) -> Vec<u32>;
    #[wasm_bindgen(method, js_name = getColumnsWithData)]
    fn js_columns_with_data(this: &JsModel, sheet: u32, row: u32) -> Vec<u32>;

    #[wasm_bindgen(method, catch, js_name = setRowsHeight)]
    fn js_set_rows_height(
        this: &JsModel,
        sheet: u32,
        row_start: u32,
        row_end: u32,
        height: f64,
    ) -> std::result::Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = setColumnsWidth)]
    fn js_set_columns_width(
        this: &JsModel,
        sheet: u32,
        column_start: u32,
        column_end: u32,
        width: f64,
    ) -> std::result::Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = autoFillRows)]
    fn js_auto_fill_rows(
        this: &JsModel,
        area: JsValue,
        to_row: u32,
    ) -> std::result::Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = autoFillColumns)]
    fn js_auto_fill_columns(
        this: &JsModel,
        area: JsValue,
        to_column: u32,
    ) -> std::result::Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = setTopLeftVisibleCell)]
    fn js_set_top_left_visible_cell(
        this: &JsModel,
        row: u32,
        column: u32,
    ) -> std::result::Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = setSelectedCell)]
    fn js_set_selected_cell(this: &JsModel, row: u32, column: u32)
        -> std::result::Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = setSelectedRange)]
    fn js_set_selected_range(
        this: &JsModel,
        row_start: u32,
        column_start: u32,
        row_end: u32,
        column_end: u32,
    ) -> std::result::Result<(), JsValue>;
}

fn model_error(e: &JsValue) -> GridError {
    GridError::Model(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl SheetModel for JsModel {
    fn selected_sheet(&self) -> u32 {
        self.js_selected_sheet()
    }

    fn row_height(&self, sheet: u32, row: u32) -> f64 {
        self.js_row_height(sheet, row)
    }

    fn column_width(&self, sheet: u32, column: u32) -> f64 {
        self.js_column_width(sheet, column)
    }

    fn frozen_rows_count(&self, sheet: u32) -> u32 {
        self.js_frozen_rows_count(sheet)
    }

    fn frozen_columns_count(&self, sheet: u32) -> u32 {
        self.js_frozen_columns_count(sheet)
    }

    fn show_grid_lines(&self, sheet: u32) -> bool {
        self.js_show_grid_lines(sheet)
    }

    fn cell_style(&self, sheet: u32, row: u32, column: u32) -> Cow<'_, CellStyle> {
        let value = self.js_cell_style(sheet, row, column);
        match serde_wasm_bindgen::from_value(value) {
            Ok(style) => Cow::Owned(style),
            Err(e) => {
                log::warn!("unreadable style at {sheet}!{row}:{column}: {e}");
                Cow::Owned(CellStyle::default())
            }
        }
    }

    fn cell_type(&self, sheet: u32, row: u32, column: u32) -> CellType {
        CellType::from(self.js_cell_type(sheet, row, column))
    }

    fn formatted_cell_value(&self, sheet: u32, row: u32, column: u32) -> String {
        self.js_formatted_cell_value(sheet, row, column)
    }

    fn selected_view(&self) -> SelectedView {
        serde_wasm_bindgen::from_value(self.js_selected_view()).unwrap_or_else(|e| {
            log::warn!("unreadable selected view: {e}");
            SelectedView::default()
        })
    }

    fn last_non_empty_in_row_before_column(
        &self,
        sheet: u32,
        row: u32,
        column: u32,
    ) -> Option<u32> {
        self.js_last_non_empty_before(sheet, row, column)
    }

    fn first_non_empty_in_row_after_column(
        &self,
        sheet: u32,
        row: u32,
        column: u32,
    ) -> Option<u32> {
        self.js_first_non_empty_after(sheet, row, column)
    }

    fn rows_with_data(&self, sheet: u32, column: u32) -> Vec<u32> {
        self.js_rows_with_data(sheet, column)
    }

    fn columns_with_data(&self, sheet: u32, row: u32) -> Vec<u32> {
        self.js_columns_with_data(sheet, row)
    }

    fn set_rows_height(
        &mut self,
        sheet: u32,
        row_start: u32,
        row_end: u32,
        height: f64,
    ) -> Result<()> {
        self.js_set_rows_height(sheet, row_start, row_end, height)
            .map_err(|e| model_error(&e))
    }

    fn set_columns_width(
        &mut self,
        sheet: u32,
        column_start: u32,
        column_end: u32,
        width: f64,
    ) -> Result<()> {
        self.js_set_columns_width(sheet, column_start, column_end, width)
            .map_err(|e| model_error(&e))
    }

    fn auto_fill_rows(&mut self, source: &AutoFillArea, to_row: u32) -> Result<()> {
        let area = serde_wasm_bindgen::to_value(source)
            .map_err(|e| GridError::Model(e.to_string()))?;
        self.js_auto_fill_rows(area, to_row)
            .map_err(|e| model_error(&e))
    }

    fn auto_fill_columns(&mut self, source: &AutoFillArea, to_column: u32) -> Result<()> {
        let area = serde_wasm_bindgen::to_value(source)
            .map_err(|e| GridError::Model(e.to_string()))?;
        self.js_auto_fill_columns(area, to_column)
            .map_err(|e| model_error(&e))
    }

    fn set_top_left_visible_cell(&mut self, row: u32, column: u32) -> Result<()> {
        self.js_set_top_left_visible_cell(row, column)
            .map_err(|e| model_error(&e))
    }

    fn set_selected_cell(&mut self, row: u32, column: u32) -> Result<()> {
        self.js_set_selected_cell(row, column)
            .map_err(|e| model_error(&e))
    }

    fn set_selected_range(&mut self, area: &CellArea) -> Result<()> {
        self.js_set_selected_range(area.row_start, area.column_start, area.row_end, area.column_end)
            .map_err(|e| model_error(&e))
    }
}
