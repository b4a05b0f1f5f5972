//! Swirl-to-capture for Wayland.
//!
//! A [`gesture::SwirlDetector`] watches the global pointer for a circular
//! motion; when it fires, a [`selection::RegionEditor`] session lets the user
//! adjust the enclosing rectangle before it is captured by [`capture`].
//! [`app::Controller`] ties these together and is driven by the Wayland
//! backend in daemon mode.

pub mod app;
pub mod backend;
pub mod capture;
pub mod config;
pub mod daemon;
pub mod draw;
pub mod gesture;
pub mod input;
pub mod notification;
pub mod pointer;
pub mod scheduler;
pub mod selection;
pub mod ui;
pub mod util;

pub use config::Config;
