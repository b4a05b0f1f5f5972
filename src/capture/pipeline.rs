use std::{fmt, sync::Arc};

use tokio::task;

use crate::capture::{
    dependencies::CaptureDependencies,
    file::FileSaveConfig,
    types::{CaptureDestination, CaptureError, CaptureRegion, CaptureResult},
};

/// One queued region capture.
#[derive(Clone)]
pub(crate) struct CaptureRequest {
    pub(crate) region: CaptureRegion,
    pub(crate) destination: CaptureDestination,
    /// `None` when nothing is written to disk.
    pub(crate) save_config: Option<FileSaveConfig>,
}

impl fmt::Debug for CaptureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureRequest")
            .field("region", &self.region.grim_geometry())
            .field("destination", &self.destination)
            .field(
                "save_directory",
                &self.save_config.as_ref().map(|cfg| &cfg.save_directory),
            )
            .finish()
    }
}

/// Runs a blocking job on Tokio's blocking pool, mapping a join failure with `on_join_error`.
async fn run_blocking<T, F>(
    job: F,
    on_join_error: fn(String) -> CaptureError,
) -> Result<T, CaptureError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CaptureError> + Send + 'static,
{
    task::spawn_blocking(job)
        .await
        .map_err(|e| on_join_error(format!("background task failed: {}", e)))?
}

/// Grabs the region, then delivers it: file first (fatal on error), then
/// clipboard. A clipboard failure is only logged when the file was saved;
/// a capture that reached no destination is an error. Never retried.
pub(crate) async fn perform_capture(
    request: CaptureRequest,
    dependencies: Arc<CaptureDependencies>,
) -> Result<CaptureResult, CaptureError> {
    let CaptureRequest {
        region,
        destination,
        save_config,
    } = request;
    log::info!("Capturing region {}", region.grim_geometry());

    let image_data = dependencies.source.capture(region).await?;
    log::debug!("Region image is {} bytes", image_data.len());

    let saved_path = match save_config.filter(|cfg| {
        destination.writes_file() && !cfg.save_directory.as_os_str().is_empty()
    }) {
        Some(config) => {
            let saver = Arc::clone(&dependencies.saver);
            let data = image_data.clone();
            let path = run_blocking(move || saver.save(&data, &config), CaptureError::ImageError)
                .await?;
            log::info!("Saved capture to {}", path.display());
            Some(path)
        }
        None => None,
    };

    let mut clipboard_error = None;
    let copied_to_clipboard = if destination.copies_to_clipboard() {
        let clipboard = Arc::clone(&dependencies.clipboard);
        let data = image_data.clone();
        match run_blocking(move || clipboard.copy(&data), CaptureError::ClipboardError).await {
            Ok(()) => {
                log::info!("Copied capture to clipboard");
                true
            }
            Err(e) => {
                log::error!("Failed to copy capture to clipboard: {}", e);
                clipboard_error = Some(e);
                false
            }
        }
    } else {
        false
    };

    if saved_path.is_none() && !copied_to_clipboard {
        return Err(clipboard_error.unwrap_or_else(|| {
            CaptureError::ImageError("Capture was not delivered to any destination".to_string())
        }));
    }

    Ok(CaptureResult {
        image_data,
        saved_path,
        copied_to_clipboard,
    })
}
