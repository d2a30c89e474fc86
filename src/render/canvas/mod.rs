//! Canvas 2D rendering backend.
//!
//! The grid paints through the HTML Canvas 2D API via web-sys. Text
//! measurement is cached across frames since it dominates the frame cost.

pub mod measure_cache;
#[cfg(target_arch = "wasm32")]
mod surface;

pub use measure_cache::TextWidthCache;
#[cfg(target_arch = "wasm32")]
pub use surface::CanvasSurface;
