//! Row/column sizes and frozen-pane totals, read from the model.

use crate::model::SheetModel;

/// Size queries for one sheet, rounded to whole pixels.
///
/// Fractional sizes would leave sub-pixel seams between cells, so every size
/// that reaches layout or paint goes through here.
pub struct Geometry<'a, M: SheetModel + ?Sized> {
    model: &'a M,
    sheet: u32,
    separator_width: f64,
}

impl<M: SheetModel + ?Sized> Clone for Geometry<'_, M> {
    fn clone(&self) -> Self {
        Self {
            model: self.model,
            sheet: self.sheet,
            separator_width: self.separator_width,
        }
    }
}

impl<'a, M: SheetModel + ?Sized> Geometry<'a, M> {
    pub fn new(model: &'a M, sheet: u32, separator_width: f64) -> Self {
        Self {
            model,
            sheet,
            separator_width,
        }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn sheet(&self) -> u32 {
        self.sheet
    }

    pub fn separator_width(&self) -> f64 {
        self.separator_width
    }

    pub fn row_height(&self, row: u32) -> f64 {
        self.model.row_height(self.sheet, row).round().max(0.0)
    }

    pub fn column_width(&self, column: u32) -> f64 {
        self.model.column_width(self.sheet, column).round().max(0.0)
    }

    pub fn frozen_rows(&self) -> u32 {
        self.model.frozen_rows_count(self.sheet)
    }

    pub fn frozen_columns(&self) -> u32 {
        self.model.frozen_columns_count(self.sheet)
    }

    /// Sum of row heights over `[start, end)`.
    pub fn rows_span(&self, start: u32, end: u32) -> f64 {
        (start..end).map(|row| self.row_height(row)).sum()
    }

    /// Sum of column widths over `[start, end)`.
    pub fn columns_span(&self, start: u32, end: u32) -> f64 {
        (start..end).map(|column| self.column_width(column)).sum()
    }

    /// Height of the frozen rows plus the separator band, or 0 with no frozen rows.
    pub fn frozen_rows_height(&self) -> f64 {
        match self.frozen_rows() {
            0 => 0.0,
            n => self.rows_span(1, n + 1) + self.separator_width,
        }
    }

    /// Width of the frozen columns plus the separator band, or 0 with no frozen columns.
    pub fn frozen_columns_width(&self) -> f64 {
        match self.frozen_columns() {
            0 => 0.0,
            n => self.columns_span(1, n + 1) + self.separator_width,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::model::MemoryModel;

    #[test]
    fn sizes_are_rounded() {
        let mut model = MemoryModel::new();
        model.set_rows_height(0, 2, 2, 20.6).unwrap();
        model.set_columns_width(0, 3, 3, 99.4).unwrap();
        let geometry = Geometry::new(&model, 0, 3.0);
        assert_eq!(geometry.row_height(2), 21.0);
        assert_eq!(geometry.column_width(3), 99.0);
    }

    #[test]
    fn frozen_totals_are_zero_without_frozen_panes() {
        let model = MemoryModel::new();
        let geometry = Geometry::new(&model, 0, 3.0);
        assert_eq!(geometry.frozen_rows_height(), 0.0);
        assert_eq!(geometry.frozen_columns_width(), 0.0);
    }

    #[test]
    fn frozen_totals_include_separator() {
        let mut model = MemoryModel::new();
        model.set_frozen(0, 2, 3).unwrap();
        model.set_rows_height(0, 2, 2, 40.0).unwrap();
        let geometry = Geometry::new(&model, 0, 3.0);
        assert_eq!(geometry.frozen_rows_height(), 28.0 + 40.0 + 3.0);
        assert_eq!(geometry.frozen_columns_width(), 300.0 + 3.0);
    }
}
