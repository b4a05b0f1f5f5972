use std::f64::consts::TAU;
use std::time::Instant;

use log::{debug, info};

use super::geometry::{self, SwirlMetrics};
use super::settings::DetectionSettings;
use super::window::{GestureWindow, TimedPoint};
use crate::util::Point;

/// Emitted once per recognized swirl.
#[derive(Debug, Clone, PartialEq)]
pub struct SwirlTrigger {
    /// Snapshot of the windowed positions that formed the swirl.
    pub points: Vec<Point>,
    pub centroid: Point,
    pub radius: f64,
    /// Signed cumulative rotation in radians; positive is clockwise on screen.
    pub rotation: f64,
    /// Instant at which the detector may fire again.
    pub cooldown_until: Instant,
}

impl SwirlTrigger {
    pub fn turns(&self) -> f64 {
        self.rotation.abs() / TAU
    }
}

/// Sliding-window swirl classifier.
///
/// Cooldown is entered on every trigger and only left through
/// [`SwirlDetector::end_cooldown`], which the owner schedules on its own timer.
#[derive(Debug)]
pub struct SwirlDetector {
    settings: DetectionSettings,
    window: GestureWindow,
    cooldown_active: bool,
    cooldown_until: Option<Instant>,
}

impl SwirlDetector {
    pub fn new(settings: DetectionSettings) -> Self {
        Self {
            settings,
            window: GestureWindow::new(),
            cooldown_active: false,
            cooldown_until: None,
        }
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    /// Replaces the thresholds. Samples already in the window are kept and
    /// re-pruned on the next insertion.
    pub fn update_settings(&mut self, settings: DetectionSettings) {
        debug!("Detection settings updated: {:?}", settings);
        self.settings = settings;
    }

    /// Feeds one sample. Returns a trigger when the window now contains a swirl.
    pub fn add_point(&mut self, position: Point, timestamp: Instant) -> Option<SwirlTrigger> {
        if !position.is_finite() {
            debug!("Ignoring non-finite pointer sample {:?}", position);
            return None;
        }

        self.window.push(
            TimedPoint::new(position, timestamp),
            self.settings.window_duration,
        );

        if self.cooldown_active || self.window.len() < self.settings.min_points {
            return None;
        }

        let points = self.window.positions();
        let metrics = geometry::analyze(&points)?;
        if !self.should_fire(&metrics) {
            return None;
        }

        let cooldown_until = timestamp + self.settings.cooldown;
        self.window.clear();
        self.cooldown_active = true;
        self.cooldown_until = Some(cooldown_until);

        info!(
            "Swirl detected: {:.2} turns, radius {:.1} around ({:.0}, {:.0})",
            metrics.turns(),
            metrics.radius,
            metrics.centroid.x,
            metrics.centroid.y
        );

        Some(SwirlTrigger {
            points,
            centroid: metrics.centroid,
            radius: metrics.radius,
            rotation: metrics.rotation,
            cooldown_until,
        })
    }

    fn should_fire(&self, metrics: &SwirlMetrics) -> bool {
        if !metrics.radius.is_finite() || metrics.radius < self.settings.min_radius {
            return false;
        }
        metrics.rotation.is_finite()
            && metrics.rotation.abs() >= self.settings.trigger_angle_radians()
    }

    /// Leaves the refractory period. Samples gathered meanwhile stay in the window.
    pub fn end_cooldown(&mut self) {
        if self.cooldown_active {
            debug!("Swirl cooldown ended");
        }
        self.cooldown_active = false;
        self.cooldown_until = None;
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_active
    }

    pub fn cooldown_until(&self) -> Option<Instant> {
        self.cooldown_until
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Drops all samples and any pending cooldown.
    pub fn reset(&mut self) {
        self.window.clear();
        self.end_cooldown();
    }
}

impl Default for SwirlDetector {
    fn default() -> Self {
        Self::new(DetectionSettings::default())
    }
}
