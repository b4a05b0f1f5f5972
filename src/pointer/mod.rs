//! Global pointer position sources.
//!
//! The overlay only receives pointer events while it is mapped, so the
//! detector is fed from a source that can see the cursor anywhere on screen.

pub mod hyprland;
pub mod poller;
pub mod replay;

use std::path::PathBuf;

use thiserror::Error;

use crate::util::Point;

pub use hyprland::HyprlandCursor;
pub use poller::{PointerPoller, PointerReading};
pub use replay::{ReplaySample, ReplaySource, ReplayTrace, ReplayTrigger};

#[derive(Debug, Error)]
pub enum PointerError {
    #[error("Hyprland instance not found (HYPRLAND_INSTANCE_SIGNATURE is not set)")]
    NoCompositor,

    #[error("Failed to talk to compositor socket {path}: {source}")]
    Socket {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected cursor position reply: {0}")]
    InvalidReply(String),

    #[error("Failed to read trace {path}: {source}")]
    TraceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid trace line {line}: {message}")]
    TraceFormat { line: usize, message: String },
}

/// Anything that can report the current global pointer position.
pub trait PointSource {
    /// Returns the current position, or `None` when nothing new is available.
    fn poll(&mut self) -> Result<Option<Point>, PointerError>;
}

/// Forwards a position only when it differs from the previous one.
#[derive(Debug, Clone, Default)]
pub struct MotionFilter {
    last: Option<Point>,
}

impl MotionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, point: Point) -> Option<Point> {
        if self.last == Some(point) {
            return None;
        }
        self.last = Some(point);
        Some(point)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_filter_drops_repeats() {
        let mut filter = MotionFilter::new();
        assert!(filter.accept(Point::new(1.0, 1.0)).is_some());
        assert!(filter.accept(Point::new(1.0, 1.0)).is_none());
        assert!(filter.accept(Point::new(2.0, 1.0)).is_some());
        assert!(filter.accept(Point::new(1.0, 1.0)).is_some());
        filter.reset();
        assert!(filter.accept(Point::new(1.0, 1.0)).is_some());
    }
}
