//! Configuration type definitions.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::enums::SaveDestination;
use crate::capture::file::{self, DEFAULT_FILENAME_TEMPLATE, FileSaveConfig};
use crate::gesture::{DetectionSettings, settings as limits};
use crate::util::expand_tilde;

/// Swirl detection thresholds.
///
/// Values are stored as written. Reading them through [`DetectionConfig::settings`]
/// or the getters applies the accepted ranges, replacing any out-of-range value
/// with its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionConfig {
    /// Sliding window length in seconds (0.5 - 3.0)
    #[serde(default = "default_window_duration")]
    pub window_duration: f64,

    /// Minimum number of samples in the window before it is evaluated (10 - 50)
    #[serde(default = "default_min_points")]
    pub min_points: i64,

    /// Rotation needed to trigger, in full turns (0.5 - 3.0)
    #[serde(default = "default_trigger_angle")]
    pub trigger_angle: f64,

    /// Minimum average distance from the swirl centre, in logical pixels (10 - 100)
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,

    /// Seconds to ignore further swirls after a trigger (0.5 - 5.0)
    #[serde(default = "default_cooldown")]
    pub cooldown: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_duration: default_window_duration(),
            min_points: default_min_points(),
            trigger_angle: default_trigger_angle(),
            min_radius: default_min_radius(),
            cooldown: default_cooldown(),
        }
    }
}

fn bounded<T>(name: &str, value: T, range: RangeInclusive<T>, default: T) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if range.contains(&value) {
        value
    } else {
        debug!(
            "Ignoring detection.{} = {} (accepted {}..={}), using {}",
            name,
            value,
            range.start(),
            range.end(),
            default
        );
        default
    }
}

impl DetectionConfig {
    pub fn window_duration(&self) -> f64 {
        bounded(
            "window_duration",
            self.window_duration,
            limits::WINDOW_DURATION_RANGE,
            limits::DEFAULT_WINDOW_DURATION,
        )
    }

    pub fn min_points(&self) -> i64 {
        bounded(
            "min_points",
            self.min_points,
            limits::MIN_POINTS_RANGE,
            limits::DEFAULT_MIN_POINTS,
        )
    }

    pub fn trigger_angle(&self) -> f64 {
        bounded(
            "trigger_angle",
            self.trigger_angle,
            limits::TRIGGER_ANGLE_RANGE,
            limits::DEFAULT_TRIGGER_ANGLE,
        )
    }

    pub fn min_radius(&self) -> f64 {
        bounded(
            "min_radius",
            self.min_radius,
            limits::MIN_RADIUS_RANGE,
            limits::DEFAULT_MIN_RADIUS,
        )
    }

    pub fn cooldown(&self) -> f64 {
        bounded(
            "cooldown",
            self.cooldown,
            limits::COOLDOWN_RANGE,
            limits::DEFAULT_COOLDOWN,
        )
    }

    pub fn set_window_duration(&mut self, seconds: f64) {
        self.window_duration = seconds;
    }

    pub fn set_min_points(&mut self, count: i64) {
        self.min_points = count;
    }

    pub fn set_trigger_angle(&mut self, turns: f64) {
        self.trigger_angle = turns;
    }

    pub fn set_min_radius(&mut self, radius: f64) {
        self.min_radius = radius;
    }

    pub fn set_cooldown(&mut self, seconds: f64) {
        self.cooldown = seconds;
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Detector settings with every value bounds-checked.
    pub fn settings(&self) -> DetectionSettings {
        DetectionSettings {
            window_duration: Duration::from_secs_f64(self.window_duration()),
            min_points: self.min_points() as usize,
            trigger_turns: self.trigger_angle(),
            min_radius: self.min_radius(),
            cooldown: Duration::from_secs_f64(self.cooldown()),
        }
    }
}

fn default_window_duration() -> f64 {
    limits::DEFAULT_WINDOW_DURATION
}

fn default_min_points() -> i64 {
    limits::DEFAULT_MIN_POINTS
}

fn default_trigger_angle() -> f64 {
    limits::DEFAULT_TRIGGER_ANGLE
}

fn default_min_radius() -> f64 {
    limits::DEFAULT_MIN_RADIUS
}

fn default_cooldown() -> f64 {
    limits::DEFAULT_COOLDOWN
}

/// Capture delivery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptureConfig {
    /// Where captures go: "both", "file-only" or "clipboard-only"
    #[serde(default)]
    pub destination: SaveDestination,

    /// Directory for saved captures (supports ~). Defaults to the desktop directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_directory: Option<String>,

    /// File name template using chrono format specifiers (without extension)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Show a desktop notification when a capture finishes or fails
    #[serde(default = "default_notify")]
    pub notify: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            destination: SaveDestination::default(),
            save_directory: None,
            filename_template: default_filename_template(),
            notify: default_notify(),
        }
    }
}

impl CaptureConfig {
    pub fn save_directory(&self) -> PathBuf {
        self.save_directory
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(file::default_save_directory)
    }

    /// File settings for the capture pipeline, or `None` when nothing is written to disk.
    pub fn file_save_config(&self) -> Option<FileSaveConfig> {
        self.destination.writes_file().then(|| FileSaveConfig {
            save_directory: self.save_directory(),
            filename_template: self.filename_template.clone(),
            format: "png".to_string(),
        })
    }
}

fn default_filename_template() -> String {
    DEFAULT_FILENAME_TEMPLATE.to_string()
}

fn default_notify() -> bool {
    true
}

/// Pointer source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PointerConfig {
    /// Cursor polling interval in milliseconds (1 - 100)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl PointerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_poll_interval_ms() -> u64 {
    8
}
