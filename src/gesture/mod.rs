//! Swirl gesture recognition over a live stream of pointer samples.

pub mod detector;
pub mod geometry;
pub mod settings;
pub mod window;

pub use detector::{SwirlDetector, SwirlTrigger};
pub use geometry::SwirlMetrics;
pub use settings::DetectionSettings;
pub use window::{GestureWindow, TimedPoint};
