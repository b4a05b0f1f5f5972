//! Seams of the capture pipeline. Production uses grim/portal, the file
//! saver and the system clipboard; tests swap in mocks.

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::capture::{
    clipboard,
    file::{self, FileSaveConfig},
    sources,
    types::{CaptureError, CaptureRegion},
};

/// Produces PNG bytes for a screen region.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn capture(&self, region: CaptureRegion) -> Result<Vec<u8>, CaptureError>;
}

/// Writes a capture to disk and returns the final path.
pub trait CaptureFileSaver: Send + Sync {
    fn save(&self, image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, CaptureError>;
}

/// Puts a PNG on the clipboard.
pub trait CaptureClipboard: Send + Sync {
    fn copy(&self, image_data: &[u8]) -> Result<(), CaptureError>;
}

#[derive(Clone)]
pub struct CaptureDependencies {
    pub source: Arc<dyn CaptureSource>,
    pub saver: Arc<dyn CaptureFileSaver>,
    pub clipboard: Arc<dyn CaptureClipboard>,
}

impl Default for CaptureDependencies {
    fn default() -> Self {
        Self {
            source: Arc::new(ScreenSource),
            saver: Arc::new(PngFileSaver),
            clipboard: Arc::new(SystemClipboard),
        }
    }
}

/// grim, falling back to the screenshot portal.
struct ScreenSource;
struct PngFileSaver;
struct SystemClipboard;

#[async_trait]
impl CaptureSource for ScreenSource {
    async fn capture(&self, region: CaptureRegion) -> Result<Vec<u8>, CaptureError> {
        sources::capture_region(region).await
    }
}

impl CaptureFileSaver for PngFileSaver {
    fn save(&self, image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, CaptureError> {
        file::save_screenshot(image_data, config)
    }
}

impl CaptureClipboard for SystemClipboard {
    fn copy(&self, image_data: &[u8]) -> Result<(), CaptureError> {
        clipboard::copy_to_clipboard(image_data)
    }
}
