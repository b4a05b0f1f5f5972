//! Backend-neutral input types.
//!
//! Backends translate their native keyboard and pointer events into these
//! types before handing them to the region editor.

pub mod click;
pub mod events;

pub use click::ClickCounter;
pub use events::{Key, MouseButton};
