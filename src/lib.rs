//! xlgrid - virtualized spreadsheet grid for the web
//!
//! Lays out and paints one sheet of a spreadsheet model on Canvas 2D via
//! WebAssembly:
//! - Non-uniform row heights and column widths with frozen panes
//! - Text overflow into empty neighbors, wrapping and alignment
//! - Borders with precedence between neighbors, fills and grid lines
//! - Selection overlays, header resize, autofill and reference dragging
//! - Only the visible cells are ever touched, whatever the sheet size
//!
//! The model is never owned: every frame reads it through [`SheetModel`],
//! and gestures write back through the same trait.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { XlGrid } from 'xlgrid';
//! await init();
//! const grid = new XlGrid(canvas, overlayRoot, model, null, devicePixelRatio);
//! grid.attachScroller(scrollContainer, spacer);
//! grid.setRefreshCallback(() => app.refresh());
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod render;
pub mod state;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{GridConfig, RenderContext};
pub use error::{GridError, Result};
pub use interaction::{PointerEvent, Refresh};
pub use layout::{SheetLayout, Viewport, VisibleCellRange};
pub use model::{MemoryModel, SheetModel};
pub use render::{render_sheet, FrameSummary, RecordingSurface, Surface, TextMeasure};
pub use state::WorkbookState;
pub use types::*;
pub use viewer::GridView;

#[cfg(target_arch = "wasm32")]
pub use viewer::XlGrid;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
