//! Data types for region capture.

use std::path::PathBuf;
use thiserror::Error;

use crate::selection::SelectionRect;

/// Logical geometry of the output a region was selected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Region to capture, in global logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Output the region lives on. Needed to crop full-screen fallback images.
    pub output: Option<OutputGeometry>,
}

impl CaptureRegion {
    /// Rounds a surface-local selection to whole pixels and moves it into
    /// global coordinates using the output's origin.
    pub fn from_selection(rect: &SelectionRect, output: Option<OutputGeometry>) -> Self {
        let (origin_x, origin_y) = output.map(|o| (o.x, o.y)).unwrap_or((0, 0));
        let left = rect.x.round();
        let top = rect.y.round();
        let width = (rect.right().round() - left).max(1.0);
        let height = (rect.bottom().round() - top).max(1.0);
        Self {
            x: origin_x + left as i32,
            y: origin_y + top as i32,
            width: width as u32,
            height: height as u32,
            output,
        }
    }

    /// Geometry string understood by `grim -g`.
    pub fn grim_geometry(&self) -> String {
        format!("{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Result of a screenshot capture operation.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Raw image data (PNG format).
    pub image_data: Vec<u8>,
    /// Path where the image was saved (if saved).
    pub saved_path: Option<PathBuf>,
    /// Whether the image was copied to clipboard.
    pub copied_to_clipboard: bool,
}

/// Outcome of a capture request (success or failure).
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    Success(CaptureResult),
    Failed(String),
    Cancelled(String),
}

/// Where the captured image should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDestination {
    ClipboardOnly,
    FileOnly,
    ClipboardAndFile,
}

impl CaptureDestination {
    pub fn writes_file(self) -> bool {
        !matches!(self, CaptureDestination::ClipboardOnly)
    }

    pub fn copies_to_clipboard(self) -> bool {
        !matches!(self, CaptureDestination::FileOnly)
    }
}

/// Errors that can occur during screenshot capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Screenshot permission denied by user")]
    PermissionDenied,

    #[error("D-Bus communication error: {0}")]
    DBusError(#[from] zbus::Error),

    #[error("Failed to save screenshot: {0}")]
    SaveError(#[from] std::io::Error),

    #[error("Clipboard operation failed: {0}")]
    ClipboardError(String),

    #[error("Image processing error: {0}")]
    ImageError(String),

    #[error("Portal returned invalid response: {0}")]
    InvalidResponse(String),

    #[error("Capture cancelled: {0}")]
    Cancelled(String),
}

/// Status of an ongoing capture operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaptureStatus {
    /// No capture requested since the last reset.
    #[default]
    Idle,
    /// Capture is in progress.
    InProgress,
    /// Capture completed successfully.
    Success,
    /// Capture failed.
    Failed(String),
    /// Capture was cancelled.
    Cancelled(String),
}
