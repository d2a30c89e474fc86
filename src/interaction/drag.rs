//! The single drag gesture in progress.

use crate::render::{Axis, ResizeHandle};
use crate::types::CellCoord;

/// A header edge being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDrag {
    pub index: u32,
    /// Size of the row/column when the drag began
    pub origin_size: f64,
    /// Canvas position of the edge when the drag began
    pub origin_edge: f64,
    /// Pointer position (x for columns, y for rows) at pointer-down
    start: f64,
    /// Offset of the pointer since pointer-down, last value that kept the size positive
    delta: f64,
}

impl ResizeDrag {
    pub fn new(handle: &ResizeHandle, pointer: f64) -> Self {
        Self {
            index: handle.index,
            origin_size: handle.size,
            origin_edge: handle.edge,
            start: pointer,
            delta: 0.0,
        }
    }

    /// Track the pointer. Positions that would make the size zero or negative
    /// leave the guide where it was.
    pub fn update(&mut self, pointer: f64) {
        let delta = pointer - self.start;
        if self.origin_size + delta > 0.0 {
            self.delta = delta;
        }
    }

    /// Size the row/column would get if released now.
    pub fn proposed_size(&self) -> f64 {
        self.origin_size + self.delta
    }

    /// Size for a release at `pointer`; may be zero or negative.
    pub fn size_at(&self, pointer: f64) -> f64 {
        self.origin_size + pointer - self.start
    }

    /// Where the live guide line sits.
    pub fn guide_position(&self) -> f64 {
        self.origin_edge + self.delta
    }
}

/// Exactly one kind of drag can be active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    ResizingColumn(ResizeDrag),
    ResizingRow(ResizeDrag),
    /// Dragging out a selection from the active cell
    SelectingArea,
    /// Dragging the outline handle to autofill
    ExtendingArea,
    /// Dragging a reference into the formula being edited, from `anchor`
    InsertingReference { anchor: CellCoord },
}

impl DragSession {
    pub fn resize(axis: Axis, drag: ResizeDrag) -> Self {
        match axis {
            Axis::Column => Self::ResizingColumn(drag),
            Axis::Row => Self::ResizingRow(drag),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The live resize guide, if a header edge is being dragged.
    pub fn resize_guide(&self) -> Option<(Axis, f64)> {
        match self {
            Self::ResizingColumn(drag) => Some((Axis::Column, drag.guide_position())),
            Self::ResizingRow(drag) => Some((Axis::Row, drag.guide_position())),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn handle() -> ResizeHandle {
        let mut pool = crate::render::HandlePool::new();
        pool.begin_frame(crate::render::headers::PoolKey {
            sheet: 0,
            frozen_rows: 0,
            frozen_columns: 0,
        });
        pool.place(Axis::Column, 2, 230.0, 100.0);
        *pool.get(Axis::Column, 2).unwrap()
    }

    #[test]
    fn guide_follows_pointer() {
        let mut drag = ResizeDrag::new(&handle(), 230.0);
        drag.update(260.0);
        assert_eq!(drag.proposed_size(), 130.0);
        assert_eq!(drag.guide_position(), 260.0);
    }

    #[test]
    fn size_never_goes_non_positive() {
        let mut drag = ResizeDrag::new(&handle(), 230.0);
        drag.update(200.0);
        drag.update(100.0);
        assert_eq!(drag.proposed_size(), 70.0);
        drag.update(130.0);
        assert_eq!(drag.proposed_size(), 70.0);
        assert_eq!(drag.size_at(130.0), 0.0);
    }

    #[test]
    fn session_reports_guide_only_while_resizing() {
        let drag = ResizeDrag::new(&handle(), 230.0);
        assert_eq!(
            DragSession::resize(Axis::Column, drag).resize_guide(),
            Some((Axis::Column, 230.0))
        );
        assert_eq!(DragSession::SelectingArea.resize_guide(), None);
        assert!(DragSession::default().is_idle());
    }
}
