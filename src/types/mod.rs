//! Data types shared between the model contract, layout and rendering.

mod cell;
mod selection;
mod style;

pub use cell::*;
pub use selection::*;
pub use style::*;
