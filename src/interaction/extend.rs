//! Extend-to (autofill) from the selection's corner handle.

use log::info;

use crate::cell_ref::LAST_COLUMN;
use crate::error::Result;
use crate::model::SheetModel;
use crate::state::WorkbookState;
use crate::types::{AreaType, AutoFillArea, CellArea, ExtendToArea};

/// Which way a drag to `(row, column)` extends `selection`, and the cells it
/// would fill.
///
/// The pointer has to leave the selection. When it is off both axes, the
/// axis it is farther along wins; ties extend nothing.
pub fn classify_extend(selection: &CellArea, row: u32, column: u32) -> Option<ExtendToArea> {
    let s = selection;
    // How far the pointer is past the selection along the other axis.
    let column_overshoot = if column < s.column_start {
        s.column_start - column
    } else {
        column.saturating_sub(s.column_end)
    };
    let row_overshoot = if row < s.row_start {
        s.row_start - row
    } else {
        row.saturating_sub(s.row_end)
    };

    if row > s.row_end && column_overshoot < row - s.row_end {
        return Some(ExtendToArea {
            area_type: AreaType::RowsDown,
            row_start: s.row_end + 1,
            row_end: row,
            column_start: s.column_start,
            column_end: s.column_end,
        });
    }
    if row < s.row_start && column_overshoot < s.row_start - row {
        return Some(ExtendToArea {
            area_type: AreaType::RowsUp,
            row_start: row,
            row_end: s.row_start - 1,
            column_start: s.column_start,
            column_end: s.column_end,
        });
    }
    if column > s.column_end && row_overshoot < column - s.column_end {
        return Some(ExtendToArea {
            area_type: AreaType::ColumnsRight,
            row_start: s.row_start,
            row_end: s.row_end,
            column_start: s.column_end + 1,
            column_end: column,
        });
    }
    if column < s.column_start && row_overshoot < s.column_start - column {
        return Some(ExtendToArea {
            area_type: AreaType::ColumnsLeft,
            row_start: s.row_start,
            row_end: s.row_end,
            column_start: column,
            column_end: s.column_start - 1,
        });
    }
    None
}

/// Finish an extend-to drag: autofill the previewed cells, then select the
/// original and filled cells together. Returns whether anything was applied.
///
/// The preview is cleared even when the model rejects the fill.
pub fn release_extend<M: SheetModel + ?Sized>(
    model: &mut M,
    state: &mut WorkbookState,
) -> Result<bool> {
    let Some(extend) = state.extend_to_area().copied() else {
        return Ok(false);
    };
    state.clear_extend_to_area();

    let view = model.selected_view();
    let selection = view.area();
    let source = AutoFillArea::from_area(view.sheet, &selection);
    match extend.area_type {
        AreaType::RowsDown => model.auto_fill_rows(&source, extend.row_end)?,
        AreaType::RowsUp => model.auto_fill_rows(&source, extend.row_start)?,
        AreaType::ColumnsRight => model.auto_fill_columns(&source, extend.column_end)?,
        AreaType::ColumnsLeft => model.auto_fill_columns(&source, extend.column_start)?,
    }
    let filled = selection.union(&extend.area());
    model.set_selected_range(&filled)?;
    info!(
        "autofilled {:?} into rows {}..={} columns {}..={}",
        extend.area_type, extend.row_start, extend.row_end, extend.column_start, extend.column_end
    );
    Ok(true)
}

/// Double-click on the corner handle: fill the selection down as far as the
/// neighboring column has data.
///
/// The neighbor is the column left of the selection, or the one right of it
/// when the left cell is empty. The fill covers the contiguous run of
/// non-empty cells in that column starting right below the selection.
pub fn fill_down_to_neighbor<M: SheetModel + ?Sized>(model: &mut M) -> Result<bool> {
    let view = model.selected_view();
    let sheet = view.sheet;
    let selection = view.area();
    let has_value = |model: &M, column: u32| {
        !model
            .formatted_cell_value(sheet, selection.row_start, column)
            .is_empty()
    };

    let left = selection.column_start.checked_sub(1).filter(|&c| c >= 1);
    let right = Some(selection.column_end + 1).filter(|&c| c <= LAST_COLUMN);
    let Some(test_column) = left
        .filter(|&c| has_value(&*model, c))
        .or_else(|| right.filter(|&c| has_value(&*model, c)))
    else {
        return Ok(false);
    };

    let mut last_row = selection.row_end;
    for row in model.rows_with_data(sheet, test_column) {
        if row <= selection.row_end {
            continue;
        }
        if row != last_row + 1 || model.formatted_cell_value(sheet, row, test_column).is_empty() {
            break;
        }
        last_row = row;
    }
    if last_row == selection.row_end {
        return Ok(false);
    }

    let source = AutoFillArea::from_area(sheet, &selection);
    model.auto_fill_rows(&source, last_row)?;
    info!(
        "filled rows {}..={} down to {last_row} following column {test_column}",
        selection.row_start, selection.row_end
    );
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
    use crate::model::MemoryModel;
    use crate::types::SelectedView;
    use test_case::test_case;

    fn selection() -> CellArea {
        CellArea::from_corners(5, 2, 7, 4)
    }

    #[test]
    fn rows_down_below_selection() {
        let area = classify_extend(&selection(), 10, 3).unwrap();
        assert_eq!(area.area_type, AreaType::RowsDown);
        assert_eq!((area.row_start, area.row_end), (8, 10));
        assert_eq!((area.column_start, area.column_end), (2, 4));
    }

    #[test]
    fn columns_left_of_selection() {
        let area = classify_extend(&selection(), 6, 1).unwrap();
        assert_eq!(area.area_type, AreaType::ColumnsLeft);
        assert_eq!((area.column_start, area.column_end), (1, 1));
        assert_eq!((area.row_start, area.row_end), (5, 7));
    }

    #[test_case(2, 3 => Some(AreaType::RowsUp); "above")]
    #[test_case(6, 9 => Some(AreaType::ColumnsRight); "right")]
    #[test_case(12, 6 => Some(AreaType::RowsDown); "down wins when farther")]
    #[test_case(9, 8 => Some(AreaType::ColumnsRight); "right wins when farther")]
    #[test_case(9, 6 => None; "diagonal tie")]
    #[test_case(6, 3 => None; "inside")]
    fn classification(row: u32, column: u32) -> Option<AreaType> {
        classify_extend(&selection(), row, column).map(|a| a.area_type)
    }

    fn model_with_selection() -> MemoryModel {
        let mut model = MemoryModel::new();
        model
            .set_view(SelectedView {
                row: 5,
                column: 2,
                range: [5, 2, 7, 4],
                ..SelectedView::default()
            })
            .unwrap();
        model
    }

    #[test]
    fn release_fills_and_selects_union() {
        let mut model = model_with_selection();
        model.set_text(5, 2, "a").unwrap();
        let mut state = WorkbookState::new();
        state.set_extend_to_area(classify_extend(&selection(), 10, 3));
        assert!(release_extend(&mut model, &mut state).unwrap());
        assert!(state.extend_to_area().is_none());
        assert_eq!(model.selected_view().area(), CellArea::from_corners(5, 2, 10, 4));
        assert_eq!(model.formatted_cell_value(0, 8, 2), "a");
    }

    #[test]
    fn release_without_preview_does_nothing() {
        let mut model = model_with_selection();
        let mut state = WorkbookState::new();
        assert!(!release_extend(&mut model, &mut state).unwrap());
        assert_eq!(model.selected_view().area(), selection());
    }

    #[test]
    fn double_click_follows_left_neighbor() {
        let mut model = MemoryModel::new();
        model
            .set_view(SelectedView {
                row: 1,
                column: 2,
                range: [1, 2, 1, 2],
                ..SelectedView::default()
            })
            .unwrap();
        for row in 1..=4 {
            model.set_number(row, 1, &row.to_string()).unwrap();
        }
        model.set_number(6, 1, "6").unwrap();
        model.set_text(1, 2, "x").unwrap();
        assert!(fill_down_to_neighbor(&mut model).unwrap());
        assert_eq!(model.formatted_cell_value(0, 4, 2), "x");
        assert_eq!(model.formatted_cell_value(0, 5, 2), "");
    }

    #[test]
    fn double_click_uses_right_neighbor_when_left_is_empty() {
        let mut model = MemoryModel::new();
        model
            .set_view(SelectedView {
                row: 1,
                column: 2,
                range: [1, 2, 1, 2],
                ..SelectedView::default()
            })
            .unwrap();
        model.set_text(1, 2, "x").unwrap();
        model.set_text(1, 3, "r").unwrap();
        model.set_text(2, 3, "r").unwrap();
        assert!(fill_down_to_neighbor(&mut model).unwrap());
        assert_eq!(model.formatted_cell_value(0, 2, 2), "x");
    }

    #[test]
    fn double_click_without_neighbors_is_a_no_op() {
        let mut model = MemoryModel::new();
        model.set_text(1, 1, "x").unwrap();
        assert!(!fill_down_to_neighbor(&mut model).unwrap());
    }
}
