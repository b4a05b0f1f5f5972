//! Region screenshot capture.
//!
//! This module provides:
//! - Region capture through `grim`, with an xdg-desktop-portal fallback
//! - Clipboard integration
//! - File saving with chrono filename templates

pub mod clipboard;
pub mod file;
pub mod portal;
pub mod types;

mod dependencies;
mod manager;
mod pipeline;
mod sources;
#[cfg(test)]
mod tests;

pub use dependencies::{CaptureClipboard, CaptureDependencies, CaptureFileSaver, CaptureSource};
pub use file::FileSaveConfig;
pub use manager::CaptureManager;
pub use sources::crop_png;
pub use types::{
    CaptureDestination, CaptureError, CaptureOutcome, CaptureRegion, CaptureResult, CaptureStatus,
    OutputGeometry,
};
