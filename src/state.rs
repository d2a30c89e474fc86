//! Transient UI state owned by the grid engine (never persisted).

use serde::{Deserialize, Serialize};

use crate::cell_ref::range_name;
use crate::types::{CellArea, ExtendToArea};

/// A range referenced by the formula being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRange {
    pub sheet: u32,
    pub area: CellArea,
    pub color: String,
}

/// Cells marked by a cut, drawn as marching ants until pasted or cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRange {
    pub sheet: u32,
    pub area: CellArea,
}

/// A reference being inserted by dragging over the grid while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedRange {
    pub sheet: u32,
    pub area: CellArea,
}

impl ReferencedRange {
    /// A1 text for the reference, as it should appear in the formula.
    pub fn text(&self) -> String {
        let a = &self.area;
        range_name(a.row_start, a.column_start, a.row_end, a.column_end)
    }
}

/// The cell whose text editor is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditingCell {
    pub sheet: u32,
    pub row: u32,
    pub column: u32,
    pub editor_width: f64,
    pub editor_height: f64,
    /// Whether the edit text is a formula, which turns grid clicks into reference insertion
    pub is_formula: bool,
    pub referenced_range: Option<ReferencedRange>,
}

impl EditingCell {
    pub fn new(sheet: u32, row: u32, column: u32, editor_width: f64, editor_height: f64) -> Self {
        Self {
            sheet,
            row,
            column,
            editor_width,
            editor_height,
            is_formula: false,
            referenced_range: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkbookState {
    extend_to_area: Option<ExtendToArea>,
    editing_cell: Option<EditingCell>,
    cut_range: Option<CutRange>,
    active_ranges: Vec<ActiveRange>,
}

impl WorkbookState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_to_area(&self) -> Option<&ExtendToArea> {
        self.extend_to_area.as_ref()
    }

    pub fn set_extend_to_area(&mut self, area: Option<ExtendToArea>) {
        self.extend_to_area = area;
    }

    pub fn clear_extend_to_area(&mut self) {
        self.extend_to_area = None;
    }

    pub fn editing_cell(&self) -> Option<&EditingCell> {
        self.editing_cell.as_ref()
    }

    pub fn editing_cell_mut(&mut self) -> Option<&mut EditingCell> {
        self.editing_cell.as_mut()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_cell.is_some()
    }

    pub fn start_editing(&mut self, cell: EditingCell) {
        self.editing_cell = Some(cell);
    }

    /// Ends the edit. Overlays hidden during the edit reappear on the next frame.
    pub fn stop_editing(&mut self) -> Option<EditingCell> {
        self.active_ranges.clear();
        self.editing_cell.take()
    }

    pub fn cut_range(&self) -> Option<&CutRange> {
        self.cut_range.as_ref()
    }

    pub fn set_cut_range(&mut self, range: Option<CutRange>) {
        self.cut_range = range;
    }

    pub fn active_ranges(&self) -> &[ActiveRange] {
        &self.active_ranges
    }

    pub fn set_active_ranges(&mut self, ranges: Vec<ActiveRange>) {
        self.active_ranges = ranges;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stop_editing_clears_active_ranges() {
        let mut state = WorkbookState::new();
        state.start_editing(EditingCell::new(0, 2, 2, 100.0, 28.0));
        state.set_active_ranges(vec![ActiveRange {
            sheet: 0,
            area: CellArea::cell(1, 1),
            color: "#59B9BC".to_string(),
        }]);
        assert!(state.is_editing());
        let cell = state.stop_editing().unwrap();
        assert_eq!((cell.row, cell.column), (2, 2));
        assert!(state.active_ranges().is_empty());
        assert!(!state.is_editing());
    }

    #[test]
    fn referenced_range_text() {
        let r = ReferencedRange {
            sheet: 0,
            area: CellArea::from_corners(3, 2, 1, 1),
        };
        assert_eq!(r.text(), "A1:B3");
    }
}
