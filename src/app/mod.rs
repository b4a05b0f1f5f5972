//! Event-loop glue between the detector, the region editor and capture.
//!
//! [`Controller`] owns every piece of core state and all deferred work. It
//! never talks to Wayland or D-Bus itself: callers feed it samples, editor
//! events and capture outcomes, and carry out the [`AppEffect`]s it returns.

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::capture::CaptureOutcome;
use crate::gesture::{DetectionSettings, SwirlDetector};
use crate::scheduler::{Scheduler, TaskId};
use crate::selection::{
    CursorHint, EditorEffect, EditorEvent, EditorOutcome, RegionEditor, SELECTION_PADDING,
    SelectionRect,
};
use crate::util::Point;

/// Delay between closing the overlay and grabbing pixels.
pub const CAPTURE_DELAY: Duration = Duration::from_millis(80);
/// How long the "captured" indicator stays up.
pub const STATUS_RESET_DELAY: Duration = Duration::from_millis(1200);

/// Indicator shown in the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AppStatus {
    #[default]
    Idle = 0,
    Selecting = 1,
    Captured = 2,
}

impl AppStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            AppStatus::Idle => "🌀",
            AppStatus::Selecting => "✂",
            AppStatus::Captured => "📸",
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => AppStatus::Selecting,
            2 => AppStatus::Captured,
            _ => AppStatus::Idle,
        }
    }
}

/// Deferred work owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppTask {
    EndCooldown,
    Capture { session: u64, rect: SelectionRect },
    ResetStatus { generation: u64 },
}

/// Requests for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEffect {
    OpenOverlay { rect: SelectionRect },
    CloseOverlay,
    Redraw,
    SetCursor(CursorHint),
    RunCapture { rect: SelectionRect },
    SetStatus(AppStatus),
    Notify {
        summary: String,
        body: String,
        icon: String,
    },
}

/// Timing knobs; tests shorten them.
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    pub capture_delay: Duration,
    pub status_reset_delay: Duration,
    /// Notify on successful captures too, not only on failures.
    pub notify_on_success: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            capture_delay: CAPTURE_DELAY,
            status_reset_delay: STATUS_RESET_DELAY,
            notify_on_success: true,
        }
    }
}

pub struct Controller {
    detector: SwirlDetector,
    scheduler: Scheduler<AppTask>,
    editor: Option<RegionEditor>,
    session: u64,
    status: AppStatus,
    status_generation: u64,
    cooldown_task: Option<TaskId>,
    options: ControllerOptions,
}

impl Controller {
    pub fn new(settings: DetectionSettings, options: ControllerOptions) -> Self {
        Self {
            detector: SwirlDetector::new(settings),
            scheduler: Scheduler::new(),
            editor: None,
            session: 0,
            status: AppStatus::Idle,
            status_generation: 0,
            cooldown_task: None,
            options,
        }
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn editor(&self) -> Option<&RegionEditor> {
        self.editor.as_ref()
    }

    pub fn is_selecting(&self) -> bool {
        self.editor.is_some()
    }

    pub fn detector(&self) -> &SwirlDetector {
        &self.detector
    }

    pub fn update_settings(&mut self, settings: DetectionSettings) {
        self.detector.update_settings(settings);
    }

    /// Earliest pending task deadline, for sizing the loop's poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Feeds a pointer sample to the detector. Ignored while a session is open.
    pub fn on_pointer_sample(&mut self, point: Point, now: Instant) -> Vec<AppEffect> {
        if self.editor.is_some() {
            return Vec::new();
        }

        let Some(trigger) = self.detector.add_point(point, now) else {
            return Vec::new();
        };

        if let Some(previous) = self.cooldown_task.take() {
            self.scheduler.cancel(previous);
        }
        self.cooldown_task = Some(
            self.scheduler
                .schedule(trigger.cooldown_until, AppTask::EndCooldown),
        );

        let Some(rect) = SelectionRect::bounding(&trigger.points, SELECTION_PADDING) else {
            warn!("Swirl trigger carried no usable points");
            return Vec::new();
        };

        self.scheduler
            .cancel_where(|task| matches!(task, AppTask::Capture { .. }));
        self.session += 1;
        self.editor = Some(RegionEditor::new(rect));
        info!(
            "Selection session {} opened at ({:.0}, {:.0}) {:.0}x{:.0}",
            self.session, rect.x, rect.y, rect.width, rect.height
        );

        let mut effects = vec![AppEffect::OpenOverlay { rect }];
        effects.extend(self.set_status(AppStatus::Selecting));
        effects
    }

    /// Forwards an input event to the open editor session.
    pub fn on_editor_event(&mut self, event: EditorEvent, now: Instant) -> Vec<AppEffect> {
        let Some(editor) = self.editor.as_mut() else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        for effect in editor.handle(event) {
            match effect {
                EditorEffect::Redraw => effects.push(AppEffect::Redraw),
                EditorEffect::SetCursor(hint) => effects.push(AppEffect::SetCursor(hint)),
                EditorEffect::Finished(_) => {}
            }
        }

        if let Some(outcome) = editor.take_outcome() {
            effects.extend(self.finish_session(outcome, now));
        }
        effects
    }

    fn finish_session(&mut self, outcome: EditorOutcome, now: Instant) -> Vec<AppEffect> {
        self.editor = None;
        let mut effects = vec![AppEffect::CloseOverlay];
        match outcome {
            EditorOutcome::Confirmed(rect) => {
                info!("Selection session {} confirmed", self.session);
                self.scheduler.schedule_after(
                    now,
                    self.options.capture_delay,
                    AppTask::Capture {
                        session: self.session,
                        rect,
                    },
                );
            }
            EditorOutcome::Cancelled => {
                info!("Selection session {} cancelled", self.session);
                effects.extend(self.set_status(AppStatus::Idle));
            }
        }
        effects
    }

    /// Runs every task due at `now`.
    pub fn fire_due(&mut self, now: Instant) -> Vec<AppEffect> {
        let mut effects = Vec::new();
        for task in self.scheduler.take_due(now) {
            match task {
                AppTask::EndCooldown => {
                    self.cooldown_task = None;
                    self.detector.end_cooldown();
                }
                AppTask::Capture { session, rect } => {
                    if session == self.session && self.editor.is_none() {
                        effects.push(AppEffect::RunCapture { rect });
                    } else {
                        debug!("Dropping capture for stale session {}", session);
                    }
                }
                AppTask::ResetStatus { generation } => {
                    if generation == self.status_generation && self.status == AppStatus::Captured
                    {
                        effects.extend(self.set_status(AppStatus::Idle));
                    }
                }
            }
        }
        effects
    }

    /// Reports the result of a capture started by [`AppEffect::RunCapture`].
    ///
    /// While a newer selection session is open the status stays `Selecting`;
    /// only the notification is emitted.
    pub fn on_capture_finished(&mut self, outcome: &CaptureOutcome, now: Instant) -> Vec<AppEffect> {
        let idle = self.editor.is_none();
        let mut effects = Vec::new();
        match outcome {
            CaptureOutcome::Success(result) => {
                if idle {
                    effects.extend(self.set_status(AppStatus::Captured));
                    self.status_generation += 1;
                    self.scheduler.schedule_after(
                        now,
                        self.options.status_reset_delay,
                        AppTask::ResetStatus {
                            generation: self.status_generation,
                        },
                    );
                }
                if self.options.notify_on_success {
                    let body = match (&result.saved_path, result.copied_to_clipboard) {
                        (Some(path), true) => {
                            format!("Saved to {} and copied to clipboard", path.display())
                        }
                        (Some(path), false) => format!("Saved to {}", path.display()),
                        (None, true) => "Copied to clipboard".to_string(),
                        (None, false) => "Capture taken".to_string(),
                    };
                    effects.push(AppEffect::Notify {
                        summary: "Region Captured".to_string(),
                        body,
                        icon: "camera-photo".to_string(),
                    });
                }
            }
            CaptureOutcome::Failed(error) => {
                if idle {
                    effects.extend(self.set_status(AppStatus::Idle));
                }
                effects.push(AppEffect::Notify {
                    summary: "Capture Failed".to_string(),
                    body: friendly_capture_error(error),
                    icon: "dialog-error".to_string(),
                });
            }
            CaptureOutcome::Cancelled(reason) => {
                info!("Capture cancelled: {}", reason);
                if idle {
                    effects.extend(self.set_status(AppStatus::Idle));
                }
            }
        }
        effects
    }

    /// Cancels all pending work and drops any open session.
    pub fn shutdown(&mut self) -> Vec<AppEffect> {
        self.scheduler.clear();
        self.cooldown_task = None;
        self.detector.reset();
        if self.editor.take().is_some() {
            return vec![AppEffect::CloseOverlay];
        }
        Vec::new()
    }

    fn set_status(&mut self, status: AppStatus) -> Option<AppEffect> {
        if self.status == status {
            return None;
        }
        self.status = status;
        Some(AppEffect::SetStatus(status))
    }
}

/// Converts raw capture errors into something a user can act on.
pub fn friendly_capture_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("permission") {
        "Permission denied. Allow screenshots for swirlcap in your portal settings.".to_string()
    } else if lower.contains("grim") && lower.contains("not found") {
        "grim is not installed and the screenshot portal is unavailable.".to_string()
    } else if lower.contains("d-bus") || lower.contains("dbus") {
        "Could not reach the screenshot portal.".to_string()
    } else if lower.contains("outside") {
        "The selected region is not on screen.".to_string()
    } else {
        "Screen capture failed. Please try again.".to_string()
    }
}
