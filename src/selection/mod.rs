//! Interactive capture-region editing.
//!
//! [`RegionEditor`] is a pure state machine: backends feed it
//! [`EditorEvent`]s and carry out the returned [`EditorEffect`]s.

pub mod editor;
pub mod geometry;

pub use editor::{DragSession, EditorEffect, EditorEvent, EditorOutcome, EditorState, RegionEditor};
pub use geometry::{
    CursorHint, HandlePosition, MIN_SIZE, SELECTION_PADDING, SelectionRect, apply_drag, hit_test,
};
