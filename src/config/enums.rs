//! Configuration enum types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureDestination;

/// Where confirmed captures are delivered.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SaveDestination {
    /// Save a PNG file and copy it to the clipboard
    #[default]
    Both,
    /// Only save a PNG file
    FileOnly,
    /// Only copy to the clipboard
    ClipboardOnly,
}

impl SaveDestination {
    pub fn capture_destination(self) -> CaptureDestination {
        match self {
            SaveDestination::Both => CaptureDestination::ClipboardAndFile,
            SaveDestination::FileOnly => CaptureDestination::FileOnly,
            SaveDestination::ClipboardOnly => CaptureDestination::ClipboardOnly,
        }
    }

    pub fn writes_file(self) -> bool {
        !matches!(self, SaveDestination::ClipboardOnly)
    }
}
