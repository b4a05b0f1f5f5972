use std::path::{Path, PathBuf};
use std::{fs, thread, time::Duration};

use crate::capture::types::CaptureError;

/// Polls for the portal's file this many times before giving up.
const MAX_ATTEMPTS: usize = 60;
const ATTEMPT_DELAY: Duration = Duration::from_millis(50);

/// Percent-decodes a `file://` URI into a local path.
fn uri_to_path(uri: &str) -> Result<PathBuf, CaptureError> {
    let url = url::Url::parse(uri)
        .map_err(|e| CaptureError::InvalidResponse(format!("Invalid file URI '{}': {}", uri, e)))?;
    url.to_file_path()
        .map_err(|_| CaptureError::InvalidResponse(format!("Not a local file URI: {}", uri)))
}

/// Waits until `path` exists and is non-empty; some portals write it asynchronously.
fn wait_for_contents(path: &Path, attempts: usize, delay: Duration) -> Result<Vec<u8>, CaptureError> {
    for attempt in 1..=attempts {
        match fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => return Ok(bytes),
            Ok(_) => log::trace!("{} still empty ({}/{})", path.display(), attempt, attempts),
            Err(e) => log::trace!("{} not ready ({}/{}): {}", path.display(), attempt, attempts, e),
        }
        if attempt < attempts {
            thread::sleep(delay);
        }
    }

    Err(CaptureError::ImageError(format!(
        "Portal screenshot {} not ready after {} attempts",
        path.display(),
        attempts
    )))
}

/// Reads the full-screen image the portal handed back, then deletes it.
pub fn read_image_from_uri(uri: &str) -> Result<Vec<u8>, CaptureError> {
    let path = uri_to_path(uri)?;
    log::debug!("Reading portal screenshot from {}", path.display());

    let data = wait_for_contents(&path, MAX_ATTEMPTS, ATTEMPT_DELAY)?;
    log::debug!("Read {} bytes from portal screenshot", data.len());

    // The portal leaves one file per request behind otherwise.
    if let Err(e) = fs::remove_file(&path) {
        log::warn!("Failed to remove portal file {}: {}", path.display(), e);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_percent_encoded_uri_and_removes_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("full screen.png");
        fs::write(&file_path, b"png-bytes").unwrap();
        let uri = url::Url::from_file_path(&file_path).unwrap().to_string();
        assert!(uri.contains("%20"));

        assert_eq!(read_image_from_uri(&uri).unwrap(), b"png-bytes");
        assert!(!file_path.exists());
    }

    #[test]
    fn rejects_non_file_uris() {
        assert!(matches!(
            read_image_from_uri("https://example.com/shot.png"),
            Err(CaptureError::InvalidResponse(_))
        ));
        assert!(matches!(
            read_image_from_uri("not a uri"),
            Err(CaptureError::InvalidResponse(_))
        ));
    }

    #[test]
    fn empty_file_times_out() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("empty.png");
        fs::write(&file_path, b"").unwrap();
        let result = wait_for_contents(&file_path, 2, Duration::from_millis(1));
        assert!(matches!(result, Err(CaptureError::ImageError(_))));
    }
}
