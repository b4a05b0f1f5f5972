use std::process::{Command, Stdio};

use tokio::task;

use crate::capture::types::{CaptureError, CaptureRegion};

/// Capture a region directly with `grim` (wlroots screencopy).
pub async fn capture_region_grim(region: CaptureRegion) -> Result<Vec<u8>, CaptureError> {
    task::spawn_blocking(move || -> Result<Vec<u8>, CaptureError> {
        let geometry = region.grim_geometry();
        log::debug!("Capturing region via grim: {}", geometry);

        let output = Command::new("grim")
            .args(["-g", &geometry, "-"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| CaptureError::ImageError(format!("Failed to run grim: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::ImageError(format!(
                "grim failed: {}",
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(CaptureError::ImageError(
                "grim returned empty screenshot".into(),
            ));
        }

        Ok(output.stdout)
    })
    .await
    .map_err(|e| CaptureError::ImageError(format!("grim capture task failed to join: {}", e)))?
}
