//! Grid rendering.
//!
//! This module provides:
//! - The [`Surface`] drawing trait and its Canvas 2D and recording backends
//! - Per-frame text layout with spill, cell fills and borders
//! - Row/column headers with their resize handle pool
//! - Selection overlay geometry and the painted range highlights
//! - Color parsing utilities

pub mod border;
pub mod canvas;
pub mod colors;
pub mod headers;
pub mod overlay;
pub mod recording;
pub mod sheet;
pub mod surface;
pub mod text;

// Re-export commonly used types
pub use colors::{normalize_color, palette, CssColor};
pub use headers::{Axis, HandlePool, ResizeHandle};
pub use overlay::{AreaOutline, ClipRect, OverlayBox, Overlays};
pub use recording::{DrawOp, RecordingSurface};
pub use sheet::{render_sheet, FrameSummary};
pub use surface::{Surface, TextMeasure};
pub use text::{SpillRegistry, TextFrame, TextLayout};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
