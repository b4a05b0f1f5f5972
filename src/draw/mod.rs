//! Cairo drawing for the selection overlay.

pub mod color;
pub mod overlay;

pub use color::Color;
pub use overlay::{clear, render_handles, render_selection};
