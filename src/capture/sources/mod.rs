use crate::capture::types::{CaptureError, CaptureRegion};

mod crop;
mod grim;
mod portal;
pub(crate) mod reader;

pub use crop::crop_png;

/// Capture `region`, preferring `grim` and falling back to the portal.
pub async fn capture_region(region: CaptureRegion) -> Result<Vec<u8>, CaptureError> {
    match grim::capture_region_grim(region).await {
        Ok(data) => Ok(data),
        Err(e) => {
            log::warn!(
                "Region capture via grim failed: {}. Falling back to portal.",
                e
            );
            portal::capture_region_via_portal(region).await
        }
    }
}
