use crate::capture::{
    portal,
    types::{CaptureError, CaptureRegion},
};

use super::crop::crop_png;
use super::reader::read_image_from_uri;

/// Full screen portal capture cropped down to `region`.
pub async fn capture_region_via_portal(region: CaptureRegion) -> Result<Vec<u8>, CaptureError> {
    let uri = portal::capture_via_portal().await?;
    log::info!("Portal returned URI: {}", uri);

    tokio::task::spawn_blocking(move || {
        let full = read_image_from_uri(&uri)?;
        crop_png(&full, &region)
    })
    .await
    .map_err(|e| CaptureError::ImageError(format!("Portal reader task failed: {}", e)))?
}
