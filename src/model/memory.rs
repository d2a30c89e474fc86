use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{clamp_column, clamp_row};
use crate::error::{GridError, Result};
use crate::types::{AutoFillArea, CellArea, CellStyle, CellType, SelectedView};

use super::SheetModel;

/// One stored cell: display text, value type and an index into the style table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCell {
    pub value: String,
    #[serde(rename = "type")]
    pub cell_type: CellType,
    pub style: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemorySheet {
    pub name: String,
    pub default_row_height: f64,
    pub default_column_width: f64,
    pub row_heights: BTreeMap<u32, f64>,
    pub column_widths: BTreeMap<u32, f64>,
    pub frozen_rows: u32,
    pub frozen_columns: u32,
    pub show_grid_lines: bool,
    /// row -> column -> cell
    pub cells: BTreeMap<u32, BTreeMap<u32, MemoryCell>>,
    pub view: SelectedView,
}

impl Default for MemorySheet {
    fn default() -> Self {
        Self {
            name: "Sheet1".to_string(),
            default_row_height: 28.0,
            default_column_width: 100.0,
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            frozen_rows: 0,
            frozen_columns: 0,
            show_grid_lines: true,
            cells: BTreeMap::new(),
            view: SelectedView::default(),
        }
    }
}

impl MemorySheet {
    fn cell(&self, row: u32, column: u32) -> Option<&MemoryCell> {
        self.cells.get(&row).and_then(|r| r.get(&column))
    }

    fn copy_cell(&mut self, from: (u32, u32), to: (u32, u32)) {
        match self.cell(from.0, from.1).cloned() {
            Some(cell) => {
                self.cells.entry(to.0).or_default().insert(to.1, cell);
            }
            None => {
                if let Some(row) = self.cells.get_mut(&to.0) {
                    row.remove(&to.1);
                }
            }
        }
    }
}

/// An in-memory spreadsheet model backed by ordered maps.
///
/// Neighbor lookups (`last_non_empty_in_row_before_column` and friends) are
/// range queries on a `BTreeMap`, so they stay logarithmic however sparse the
/// row is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryModel {
    pub sheets: Vec<MemorySheet>,
    pub selected_sheet: u32,
    /// Style table; index 0 is the default style
    pub styles: Vec<CellStyle>,
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self {
            sheets: vec![MemorySheet::default()],
            selected_sheet: 0,
            styles: vec![CellStyle::default()],
        }
    }
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a model from JSON (see `MemorySheet` for the field names).
    pub fn from_json(json: &str) -> Result<Self> {
        let mut model: Self = serde_json::from_str(json)?;
        if model.sheets.is_empty() {
            model.sheets.push(MemorySheet::default());
        }
        if model.styles.is_empty() {
            model.styles.push(CellStyle::default());
        }
        Ok(model)
    }

    pub fn sheet(&self, sheet: u32) -> Option<&MemorySheet> {
        self.sheets.get(sheet as usize)
    }

    fn sheet_mut(&mut self, sheet: u32) -> Result<&mut MemorySheet> {
        self.sheets
            .get_mut(sheet as usize)
            .ok_or_else(|| GridError::Model(format!("no sheet {sheet}")))
    }

    fn cell(&self, sheet: u32, row: u32, column: u32) -> Option<&MemoryCell> {
        self.sheet(sheet).and_then(|s| s.cell(row, column))
    }

    /// Store a value, keeping the cell's current style.
    pub fn set_cell(
        &mut self,
        sheet: u32,
        row: u32,
        column: u32,
        value: &str,
        cell_type: CellType,
    ) -> Result<()> {
        let s = self.sheet_mut(sheet)?;
        let cell = s.cells.entry(row).or_default().entry(column).or_default();
        cell.value = value.to_string();
        cell.cell_type = cell_type;
        Ok(())
    }

    /// Shorthand for a text cell on the selected sheet.
    pub fn set_text(&mut self, row: u32, column: u32, value: &str) -> Result<()> {
        self.set_cell(self.selected_sheet, row, column, value, CellType::Text)
    }

    /// Shorthand for a numeric cell on the selected sheet.
    pub fn set_number(&mut self, row: u32, column: u32, value: &str) -> Result<()> {
        self.set_cell(self.selected_sheet, row, column, value, CellType::Number)
    }

    /// Attach a style to a cell, creating the cell if needed.
    pub fn set_style(&mut self, sheet: u32, row: u32, column: u32, style: CellStyle) -> Result<()> {
        let index = match self.styles.iter().position(|s| *s == style) {
            Some(index) => index,
            None => {
                self.styles.push(style);
                self.styles.len() - 1
            }
        };
        let s = self.sheet_mut(sheet)?;
        s.cells.entry(row).or_default().entry(column).or_default().style = index;
        Ok(())
    }

    pub fn set_frozen(&mut self, sheet: u32, rows: u32, columns: u32) -> Result<()> {
        let s = self.sheet_mut(sheet)?;
        s.frozen_rows = rows;
        s.frozen_columns = columns;
        Ok(())
    }

    pub fn set_show_grid_lines(&mut self, sheet: u32, show: bool) -> Result<()> {
        self.sheet_mut(sheet)?.show_grid_lines = show;
        Ok(())
    }

    pub fn set_view(&mut self, view: SelectedView) -> Result<()> {
        self.selected_sheet = view.sheet;
        self.sheet_mut(view.sheet)?.view = view;
        Ok(())
    }
}

impl SheetModel for MemoryModel {
    fn selected_sheet(&self) -> u32 {
        self.selected_sheet
    }

    fn row_height(&self, sheet: u32, row: u32) -> f64 {
        self.sheet(sheet).map_or(0.0, |s| {
            s.row_heights.get(&row).copied().unwrap_or(s.default_row_height)
        })
    }

    fn column_width(&self, sheet: u32, column: u32) -> f64 {
        self.sheet(sheet).map_or(0.0, |s| {
            s.column_widths
                .get(&column)
                .copied()
                .unwrap_or(s.default_column_width)
        })
    }

    fn frozen_rows_count(&self, sheet: u32) -> u32 {
        self.sheet(sheet).map_or(0, |s| s.frozen_rows)
    }

    fn frozen_columns_count(&self, sheet: u32) -> u32 {
        self.sheet(sheet).map_or(0, |s| s.frozen_columns)
    }

    fn show_grid_lines(&self, sheet: u32) -> bool {
        self.sheet(sheet).map_or(true, |s| s.show_grid_lines)
    }

    fn cell_style(&self, sheet: u32, row: u32, column: u32) -> Cow<'_, CellStyle> {
        let index = self.cell(sheet, row, column).map_or(0, |c| c.style);
        match self.styles.get(index) {
            Some(style) => Cow::Borrowed(style),
            None => Cow::Owned(CellStyle::default()),
        }
    }

    fn cell_type(&self, sheet: u32, row: u32, column: u32) -> CellType {
        self.cell(sheet, row, column)
            .map_or(CellType::Text, |c| c.cell_type)
    }

    fn formatted_cell_value(&self, sheet: u32, row: u32, column: u32) -> String {
        self.cell(sheet, row, column)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    fn selected_view(&self) -> SelectedView {
        self.sheet(self.selected_sheet)
            .map(|s| s.view)
            .unwrap_or_default()
    }

    fn last_non_empty_in_row_before_column(
        &self,
        sheet: u32,
        row: u32,
        column: u32,
    ) -> Option<u32> {
        let cells = self.sheet(sheet)?.cells.get(&row)?;
        cells
            .range(..column)
            .rev()
            .find(|(_, c)| !c.value.is_empty())
            .map(|(&col, _)| col)
    }

    fn first_non_empty_in_row_after_column(
        &self,
        sheet: u32,
        row: u32,
        column: u32,
    ) -> Option<u32> {
        let cells = self.sheet(sheet)?.cells.get(&row)?;
        cells
            .range(column.saturating_add(1)..)
            .find(|(_, c)| !c.value.is_empty())
            .map(|(&col, _)| col)
    }

    fn rows_with_data(&self, sheet: u32, column: u32) -> Vec<u32> {
        self.sheet(sheet).map_or_else(Vec::new, |s| {
            s.cells
                .iter()
                .filter(|(_, cells)| cells.get(&column).is_some_and(|c| !c.value.is_empty()))
                .map(|(&row, _)| row)
                .collect()
        })
    }

    fn columns_with_data(&self, sheet: u32, row: u32) -> Vec<u32> {
        self.sheet(sheet)
            .and_then(|s| s.cells.get(&row))
            .map_or_else(Vec::new, |cells| {
                cells
                    .iter()
                    .filter(|(_, c)| !c.value.is_empty())
                    .map(|(&col, _)| col)
                    .collect()
            })
    }

    fn set_rows_height(
        &mut self,
        sheet: u32,
        row_start: u32,
        row_end: u32,
        height: f64,
    ) -> Result<()> {
        let s = self.sheet_mut(sheet)?;
        for row in row_start.min(row_end)..=row_start.max(row_end) {
            s.row_heights.insert(row, height);
        }
        Ok(())
    }

    fn set_columns_width(
        &mut self,
        sheet: u32,
        column_start: u32,
        column_end: u32,
        width: f64,
    ) -> Result<()> {
        let s = self.sheet_mut(sheet)?;
        for column in column_start.min(column_end)..=column_start.max(column_end) {
            s.column_widths.insert(column, width);
        }
        Ok(())
    }

    fn auto_fill_rows(&mut self, source: &AutoFillArea, to_row: u32) -> Result<()> {
        if source.height == 0 {
            return Ok(());
        }
        let s = self.sheet_mut(source.sheet)?;
        let first = source.row;
        let last = source.row + source.height - 1;
        let columns = source.column..source.column + source.width;
        if to_row > last {
            for row in last + 1..=to_row {
                let from = first + (row - last - 1) % source.height;
                for column in columns.clone() {
                    s.copy_cell((from, column), (row, column));
                }
            }
        } else if to_row < first {
            for row in (to_row..first).rev() {
                let from = last - (first - 1 - row) % source.height;
                for column in columns.clone() {
                    s.copy_cell((from, column), (row, column));
                }
            }
        }
        Ok(())
    }

    fn auto_fill_columns(&mut self, source: &AutoFillArea, to_column: u32) -> Result<()> {
        if source.width == 0 {
            return Ok(());
        }
        let s = self.sheet_mut(source.sheet)?;
        let first = source.column;
        let last = source.column + source.width - 1;
        let rows = source.row..source.row + source.height;
        if to_column > last {
            for column in last + 1..=to_column {
                let from = first + (column - last - 1) % source.width;
                for row in rows.clone() {
                    s.copy_cell((row, from), (row, column));
                }
            }
        } else if to_column < first {
            for column in (to_column..first).rev() {
                let from = last - (first - 1 - column) % source.width;
                for row in rows.clone() {
                    s.copy_cell((row, from), (row, column));
                }
            }
        }
        Ok(())
    }

    fn set_top_left_visible_cell(&mut self, row: u32, column: u32) -> Result<()> {
        let sheet = self.selected_sheet;
        let view = &mut self.sheet_mut(sheet)?.view;
        view.top_row = clamp_row(row);
        view.left_column = clamp_column(column);
        Ok(())
    }

    fn set_selected_cell(&mut self, row: u32, column: u32) -> Result<()> {
        let sheet = self.selected_sheet;
        let view = &mut self.sheet_mut(sheet)?.view;
        let (row, column) = (clamp_row(row), clamp_column(column));
        view.row = row;
        view.column = column;
        view.range = [row, column, row, column];
        Ok(())
    }

    fn set_selected_range(&mut self, area: &CellArea) -> Result<()> {
        let sheet = self.selected_sheet;
        let view = &mut self.sheet_mut(sheet)?.view;
        view.range = [area.row_start, area.column_start, area.row_end, area.column_end];
        if !area.contains(view.row, view.column) {
            view.row = area.row_start;
            view.column = area.column_start;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn sizes_fall_back_to_defaults() {
        let mut model = MemoryModel::new();
        model.set_rows_height(0, 3, 4, 40.0).unwrap();
        assert_eq!(model.row_height(0, 2), 28.0);
        assert_eq!(model.row_height(0, 4), 40.0);
        assert_eq!(model.column_width(0, 9), 100.0);
        assert_eq!(model.row_height(7, 1), 0.0);
    }

    #[test]
    fn neighbor_lookups_skip_empty_text() {
        let mut model = MemoryModel::new();
        model.set_text(1, 2, "a").unwrap();
        model.set_text(1, 5, "").unwrap();
        model.set_text(1, 9, "b").unwrap();
        assert_eq!(model.last_non_empty_in_row_before_column(0, 1, 9), Some(2));
        assert_eq!(model.first_non_empty_in_row_after_column(0, 1, 2), Some(9));
        assert_eq!(model.first_non_empty_in_row_after_column(0, 1, 9), None);
        assert_eq!(model.columns_with_data(0, 1), vec![2, 9]);
        assert_eq!(model.rows_with_data(0, 2), vec![1]);
    }

    #[test]
    fn styles_are_deduplicated() {
        let mut model = MemoryModel::new();
        let mut style = CellStyle::default();
        style.font.b = true;
        model.set_style(0, 1, 1, style.clone()).unwrap();
        model.set_style(0, 2, 2, style).unwrap();
        assert_eq!(model.styles.len(), 2);
        assert!(model.cell_style(0, 2, 2).font.b);
        assert!(!model.cell_style(0, 3, 3).font.b);
    }

    #[test]
    fn auto_fill_rows_repeats_pattern_down_and_up() {
        let mut model = MemoryModel::new();
        model.set_text(5, 1, "x").unwrap();
        model.set_text(6, 1, "y").unwrap();
        let source = AutoFillArea {
            sheet: 0,
            row: 5,
            column: 1,
            width: 1,
            height: 2,
        };
        model.auto_fill_rows(&source, 9).unwrap();
        let col: Vec<String> = (7..=9)
            .map(|r| model.formatted_cell_value(0, r, 1))
            .collect();
        assert_eq!(col, vec!["x", "y", "x"]);

        model.auto_fill_rows(&source, 3).unwrap();
        assert_eq!(model.formatted_cell_value(0, 4, 1), "y");
        assert_eq!(model.formatted_cell_value(0, 3, 1), "x");
    }

    #[test]
    fn auto_fill_columns_left() {
        let mut model = MemoryModel::new();
        model.set_text(2, 4, "a").unwrap();
        let source = AutoFillArea {
            sheet: 0,
            row: 2,
            column: 4,
            width: 1,
            height: 1,
        };
        model.auto_fill_columns(&source, 2).unwrap();
        assert_eq!(model.formatted_cell_value(0, 2, 2), "a");
        assert_eq!(model.formatted_cell_value(0, 2, 3), "a");
    }

    #[test]
    fn selection_updates_view() {
        let mut model = MemoryModel::new();
        model.set_selected_cell(4, 2).unwrap();
        assert_eq!(model.selected_view().range, [4, 2, 4, 2]);
        model
            .set_selected_range(&CellArea::from_corners(10, 10, 12, 12))
            .unwrap();
        let view = model.selected_view();
        assert_eq!((view.row, view.column), (10, 10));
        model.set_top_left_visible_cell(0, 20).unwrap();
        assert_eq!(model.selected_view().top_row, 1);
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{
            "sheets": [{
                "frozenRows": 1,
                "rowHeights": {"2": 40},
                "cells": {"1": {"1": {"value": "Hello", "type": 2}}}
            }]
        }"#;
        let model = MemoryModel::from_json(json).unwrap();
        assert_eq!(model.frozen_rows_count(0), 1);
        assert_eq!(model.row_height(0, 2), 40.0);
        assert_eq!(model.formatted_cell_value(0, 1, 1), "Hello");
        assert_eq!(model.styles.len(), 1);
    }
}
