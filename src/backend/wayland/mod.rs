//! Wayland overlay backend: layer-shell selection surface, seat input and the
//! event loop that drives pointer polling, deferred tasks and capture.

mod backend;
mod handlers;
mod state;
mod surface;

pub use backend::WaylandBackend;
