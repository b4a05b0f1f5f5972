//! Copying captured PNGs to the Wayland clipboard.

use std::io::Write;
use std::process::{Command, Stdio};

use wl_clipboard_rs::copy::{MimeType, Options, ServeRequests, Source};

use super::types::CaptureError;

const PNG_MIME: &str = "image/png";

type CopyStrategy = fn(&[u8]) -> Result<(), CaptureError>;

/// Tried in order until one succeeds.
const STRATEGIES: [(&str, CopyStrategy); 2] = [
    ("wl-copy", copy_via_command),
    ("wl-clipboard-rs", copy_via_library),
];

/// Copy PNG bytes to the clipboard.
pub fn copy_to_clipboard(image_data: &[u8]) -> Result<(), CaptureError> {
    log::debug!("Copying {} bytes to clipboard", image_data.len());
    run_strategies(&STRATEGIES, image_data)
}

fn run_strategies(
    strategies: &[(&str, CopyStrategy)],
    image_data: &[u8],
) -> Result<(), CaptureError> {
    let mut failures = Vec::new();
    for (name, strategy) in strategies {
        match strategy(image_data) {
            Ok(()) => {
                log::info!("Copied capture to clipboard via {}", name);
                return Ok(());
            }
            Err(e) => {
                log::warn!("Clipboard copy via {} failed: {}", name, e);
                failures.push(format!("{name}: {e}"));
            }
        }
    }
    Err(CaptureError::ClipboardError(failures.join("; ")))
}

fn copy_via_command(image_data: &[u8]) -> Result<(), CaptureError> {
    let mut child = Command::new("wl-copy")
        .args(["--type", PNG_MIME])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CaptureError::ClipboardError(format!("cannot spawn wl-copy: {}", e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(image_data)
            .map_err(|e| CaptureError::ClipboardError(format!("writing to wl-copy: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| CaptureError::ClipboardError(format!("waiting for wl-copy: {}", e)))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(CaptureError::ClipboardError(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

fn copy_via_library(image_data: &[u8]) -> Result<(), CaptureError> {
    let mut opts = Options::new();
    opts.serve_requests(ServeRequests::Only(1));
    opts.copy(
        Source::Bytes(image_data.into()),
        MimeType::Specific(PNG_MIME.to_string()),
    )
    .map_err(|e| CaptureError::ClipboardError(e.to_string()))
}
