//! Pointer gestures over the grid and the model commands they issue.

pub mod autosize;
pub mod drag;
pub mod extend;
pub mod pointer;
pub mod resize;

pub use autosize::{autosize, fitted_column_width, fitted_row_height};
pub use drag::{DragSession, ResizeDrag};
pub use extend::{classify_extend, fill_down_to_neighbor, release_extend};
pub use pointer::{hit_test, GestureContext, HitTarget, PointerController, PointerEvent, Refresh};
pub use resize::{commit_resize, resize_span};
