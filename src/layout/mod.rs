//! Layout engine: sizes, viewport resolution and cell <-> pixel mapping.
//!
//! This module handles:
//! - Rounded row/column sizes and frozen-pane totals
//! - Resolving scroll offsets to a viewport origin and the visible cell range
//! - Bidirectional coordinate mapping across the four panes

mod coords;
mod geometry;
mod sheet_layout;
mod viewport;

pub use geometry::Geometry;
pub use sheet_layout::{CellRect, Pane, PaneKind, SheetLayout};
pub use viewport::{Viewport, VisibleCellRange};
