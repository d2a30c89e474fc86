use serde::{Deserialize, Serialize};

use crate::cell_ref::{LAST_COLUMN, LAST_ROW};

/// A single 1-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub column: u32,
}

impl CellCoord {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// A normalized rectangular block of cells (start <= end on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellArea {
    pub row_start: u32,
    pub column_start: u32,
    pub row_end: u32,
    pub column_end: u32,
}

impl CellArea {
    /// Build an area from two corners in any order.
    pub fn from_corners(row_a: u32, column_a: u32, row_b: u32, column_b: u32) -> Self {
        Self {
            row_start: row_a.min(row_b),
            column_start: column_a.min(column_b),
            row_end: row_a.max(row_b),
            column_end: column_a.max(column_b),
        }
    }

    pub fn cell(row: u32, column: u32) -> Self {
        Self::from_corners(row, column, row, column)
    }

    pub fn is_single_cell(&self) -> bool {
        self.row_start == self.row_end && self.column_start == self.column_end
    }

    pub fn contains(&self, row: u32, column: u32) -> bool {
        (self.row_start..=self.row_end).contains(&row)
            && (self.column_start..=self.column_end).contains(&column)
    }

    pub fn contains_row(&self, row: u32) -> bool {
        (self.row_start..=self.row_end).contains(&row)
    }

    pub fn contains_column(&self, column: u32) -> bool {
        (self.column_start..=self.column_end).contains(&column)
    }

    /// Smallest area covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            row_start: self.row_start.min(other.row_start),
            column_start: self.column_start.min(other.column_start),
            row_end: self.row_end.max(other.row_end),
            column_end: self.column_end.max(other.column_end),
        }
    }

    pub fn height(&self) -> u32 {
        self.row_end - self.row_start + 1
    }

    pub fn width(&self) -> u32 {
        self.column_end - self.column_start + 1
    }

    /// Spans every row of the sheet (a whole-column selection).
    pub fn is_full_columns(&self) -> bool {
        self.row_start == 1 && self.row_end == LAST_ROW
    }

    /// Spans every column of the sheet (a whole-row selection).
    pub fn is_full_rows(&self) -> bool {
        self.column_start == 1 && self.column_end == LAST_COLUMN
    }

    pub fn kind(&self) -> SelectionType {
        match (self.is_full_rows(), self.is_full_columns()) {
            (true, true) => SelectionType::All,
            (true, false) => SelectionType::RowRange,
            (false, true) => SelectionType::ColumnRange,
            (false, false) => SelectionType::CellRange,
        }
    }
}

/// Shape of a selection, as far as headers and resize spans care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionType {
    #[default]
    CellRange,
    /// Entire row(s) selected
    RowRange,
    /// Entire column(s) selected
    ColumnRange,
    /// All cells selected (corner click)
    All,
}

/// The model's view of the current selection and scroll origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedView {
    pub sheet: u32,
    /// Active cell
    pub row: u32,
    pub column: u32,
    /// `[row_start, column_start, row_end, column_end]`, possibly unordered
    pub range: [u32; 4],
    pub top_row: u32,
    pub left_column: u32,
}

impl Default for SelectedView {
    fn default() -> Self {
        Self {
            sheet: 0,
            row: 1,
            column: 1,
            range: [1, 1, 1, 1],
            top_row: 1,
            left_column: 1,
        }
    }
}

impl SelectedView {
    /// The selected range, normalized.
    pub fn area(&self) -> CellArea {
        let [r1, c1, r2, c2] = self.range;
        CellArea::from_corners(r1, c1, r2, c2)
    }

    pub fn active_cell(&self) -> CellCoord {
        CellCoord::new(self.row, self.column)
    }
}

/// Direction in which an extend-to drag grows the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaType {
    RowsDown,
    ColumnsRight,
    RowsUp,
    ColumnsLeft,
}

/// The live extend-to preview: only the cells that will be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendToArea {
    pub area_type: AreaType,
    pub row_start: u32,
    pub row_end: u32,
    pub column_start: u32,
    pub column_end: u32,
}

impl ExtendToArea {
    pub fn area(&self) -> CellArea {
        CellArea::from_corners(self.row_start, self.column_start, self.row_end, self.column_end)
    }
}

/// Source block handed to the model's autofill commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoFillArea {
    pub sheet: u32,
    pub row: u32,
    pub column: u32,
    pub width: u32,
    pub height: u32,
}

impl AutoFillArea {
    pub fn from_area(sheet: u32, area: &CellArea) -> Self {
        Self {
            sheet,
            row: area.row_start,
            column: area.column_start,
            width: area.width(),
            height: area.height(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn areas_normalize_and_union() {
        let a = CellArea::from_corners(7, 4, 5, 2);
        assert_eq!((a.row_start, a.column_start, a.row_end, a.column_end), (5, 2, 7, 4));
        assert_eq!((a.height(), a.width()), (3, 3));
        let b = CellArea::from_corners(8, 2, 10, 4);
        assert_eq!(a.union(&b), CellArea::from_corners(5, 2, 10, 4));
        assert!(a.contains(6, 3));
        assert!(!a.contains(8, 3));
    }

    #[test]
    fn selection_kinds() {
        assert_eq!(CellArea::from_corners(1, 3, LAST_ROW, 4).kind(), SelectionType::ColumnRange);
        assert_eq!(CellArea::from_corners(2, 1, 2, LAST_COLUMN).kind(), SelectionType::RowRange);
        assert_eq!(CellArea::from_corners(1, 1, LAST_ROW, LAST_COLUMN).kind(), SelectionType::All);
        assert_eq!(CellArea::cell(3, 3).kind(), SelectionType::CellRange);
    }

    #[test]
    fn selected_view_area_is_ordered() {
        let view = SelectedView {
            range: [9, 5, 2, 1],
            ..SelectedView::default()
        };
        assert_eq!(view.area(), CellArea::from_corners(2, 1, 9, 5));
    }
}
