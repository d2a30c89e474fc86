//! Committing row height and column width changes.

use log::info;

use crate::error::Result;
use crate::model::SheetModel;
use crate::render::Axis;
use crate::types::CellArea;

/// Rows or columns a resize of `index` applies to.
///
/// Dragging an edge inside a whole-column selection resizes every selected
/// column (and likewise for whole rows); otherwise only the dragged one.
/// Selecting the whole sheet does not count for either axis.
pub fn resize_span(selection: &CellArea, axis: Axis, index: u32) -> (u32, u32) {
    match axis {
        Axis::Column
            if selection.is_full_columns()
                && !selection.is_full_rows()
                && selection.contains_column(index) =>
        {
            (selection.column_start, selection.column_end)
        }
        Axis::Row
            if selection.is_full_rows()
                && !selection.is_full_columns()
                && selection.contains_row(index) =>
        {
            (selection.row_start, selection.row_end)
        }
        _ => (index, index),
    }
}

/// Apply a finished resize drag. Returns whether the model changed.
///
/// Releasing at the original size, or at a size that is zero or negative,
/// issues no command.
pub fn commit_resize<M: SheetModel + ?Sized>(
    model: &mut M,
    axis: Axis,
    index: u32,
    origin_size: f64,
    new_size: f64,
) -> Result<bool> {
    if new_size <= 0.0 || (new_size - origin_size).abs() < f64::EPSILON {
        return Ok(false);
    }
    let sheet = model.selected_sheet();
    let (start, end) = resize_span(&model.selected_view().area(), axis, index);
    match axis {
        Axis::Column => model.set_columns_width(sheet, start, end, new_size)?,
        Axis::Row => model.set_rows_height(sheet, start, end, new_size)?,
    }
    info!("resized {axis:?} {start}..={end} on sheet {sheet} to {new_size}px");
    Ok(true)
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
    use crate::cell_ref::{LAST_COLUMN, LAST_ROW};
    use crate::model::MemoryModel;
    use crate::types::SelectedView;
    use test_case::test_case;

    #[test_case(CellArea::cell(2, 2), 3 => (3, 3); "plain selection")]
    #[test_case(CellArea::from_corners(1, 2, LAST_ROW, 5), 3 => (2, 5); "inside full columns")]
    #[test_case(CellArea::from_corners(1, 2, LAST_ROW, 5), 7 => (7, 7); "outside full columns")]
    #[test_case(CellArea::from_corners(1, 1, LAST_ROW, LAST_COLUMN), 3 => (3, 3); "whole sheet")]
    fn column_spans(selection: CellArea, column: u32) -> (u32, u32) {
        resize_span(&selection, Axis::Column, column)
    }

    #[test]
    fn row_span_uses_full_rows() {
        let selection = CellArea::from_corners(4, 1, 6, LAST_COLUMN);
        assert_eq!(resize_span(&selection, Axis::Row, 5), (4, 6));
        assert_eq!(resize_span(&selection, Axis::Column, 5), (5, 5));
    }

    #[test]
    fn unchanged_size_is_a_no_op() {
        let mut model = MemoryModel::new();
        assert!(!commit_resize(&mut model, Axis::Column, 2, 100.0, 100.0).unwrap());
        assert!(!commit_resize(&mut model, Axis::Column, 2, 100.0, 0.0).unwrap());
        assert!(!commit_resize(&mut model, Axis::Row, 2, 28.0, -5.0).unwrap());
        assert_eq!(model.column_width(0, 2), 100.0);
        assert_eq!(model.row_height(0, 2), 28.0);
    }

    #[test]
    fn resizes_whole_selected_columns() {
        let mut model = MemoryModel::new();
        model
            .set_view(SelectedView {
                range: [1, 2, LAST_ROW, 4],
                ..SelectedView::default()
            })
            .unwrap();
        assert!(commit_resize(&mut model, Axis::Column, 3, 100.0, 150.0).unwrap());
        for column in 2..=4 {
            assert_eq!(model.column_width(0, column), 150.0);
        }
        assert_eq!(model.column_width(0, 5), 100.0);
    }
}
