//! Validated runtime settings for the swirl detector.

use std::f64::consts::TAU;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Accepted range for the sliding window length, in seconds.
pub const WINDOW_DURATION_RANGE: RangeInclusive<f64> = 0.5..=3.0;
/// Accepted range for the minimum number of windowed samples.
pub const MIN_POINTS_RANGE: RangeInclusive<i64> = 10..=50;
/// Accepted range for the trigger angle, in turns.
pub const TRIGGER_ANGLE_RANGE: RangeInclusive<f64> = 0.5..=3.0;
/// Accepted range for the minimum average radius, in logical pixels.
pub const MIN_RADIUS_RANGE: RangeInclusive<f64> = 10.0..=100.0;
/// Accepted range for the refractory period, in seconds.
pub const COOLDOWN_RANGE: RangeInclusive<f64> = 0.5..=5.0;

pub const DEFAULT_WINDOW_DURATION: f64 = 1.4;
pub const DEFAULT_MIN_POINTS: i64 = 25;
pub const DEFAULT_TRIGGER_ANGLE: f64 = 1.5;
pub const DEFAULT_MIN_RADIUS: f64 = 30.0;
pub const DEFAULT_COOLDOWN: f64 = 2.5;

/// Detection thresholds, already bounds-checked.
///
/// Built from [`crate::config::DetectionConfig::settings`], which replaces any
/// out-of-range value with its default before it reaches the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSettings {
    /// How long a sample stays in the sliding window.
    pub window_duration: Duration,
    /// Minimum number of windowed samples before the window is evaluated.
    pub min_points: usize,
    /// Cumulative rotation required to fire, in turns.
    pub trigger_turns: f64,
    /// Minimum mean distance from the centroid.
    pub min_radius: f64,
    /// Refractory period after a trigger.
    pub cooldown: Duration,
}

impl DetectionSettings {
    /// Trigger threshold converted to radians (`turns × 2π`).
    pub fn trigger_angle_radians(&self) -> f64 {
        self.trigger_turns * TAU
    }
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            window_duration: Duration::from_secs_f64(DEFAULT_WINDOW_DURATION),
            min_points: DEFAULT_MIN_POINTS as usize,
            trigger_turns: DEFAULT_TRIGGER_ANGLE,
            min_radius: DEFAULT_MIN_RADIUS,
            cooldown: Duration::from_secs_f64(DEFAULT_COOLDOWN),
        }
    }
}
