// Coordinates backend startup/shutdown and drives the calloop event loop while
// delegating protocol state to `WaylandState` and its handler modules.
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use calloop::EventLoop;
use calloop::channel::{self, Event};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState, output::OutputState,
    reexports::calloop_wayland_source::WaylandSource, registry::RegistryState, seat::SeatState,
    shell::wlr_layer::LayerShell, shm::Shm,
};
use wayland_client::{Connection, globals::registry_queue_init};

use super::state::WaylandState;
use crate::{
    app::{Controller, ControllerOptions},
    capture::CaptureManager,
    config::Config,
    daemon::SharedStatus,
    pointer::{HyprlandCursor, PointerPoller, PointerReading},
};

/// Upper bound on how long the loop sleeps, so the quit flag is noticed.
const MAX_DISPATCH_TIMEOUT: Duration = Duration::from_millis(100);
/// Consecutive render failures tolerated before the backend gives up.
const MAX_RENDER_FAILURES: u32 = 10;

/// Wayland backend state
pub struct WaylandBackend {
    config: Config,
    quit: Arc<AtomicBool>,
    status: SharedStatus,
    /// Tokio runtime for capture and notifications
    tokio_runtime: tokio::runtime::Runtime,
}

impl WaylandBackend {
    pub fn new(config: Config, quit: Arc<AtomicBool>, status: SharedStatus) -> Result<Self> {
        let tokio_runtime = tokio::runtime::Runtime::new()
            .context("Failed to create Tokio runtime for capture operations")?;
        Ok(Self {
            config,
            quit,
            status,
            tokio_runtime,
        })
    }

    /// Runs until the quit flag is raised or the connection fails.
    pub fn run(&mut self) -> Result<()> {
        info!("Starting Wayland backend");

        let conn =
            Connection::connect_to_env().context("Failed to connect to Wayland compositor")?;
        debug!("Connected to Wayland display");

        let (globals, event_queue) =
            registry_queue_init(&conn).context("Failed to initialize Wayland registry")?;
        let qh = event_queue.handle();

        let compositor_state =
            CompositorState::bind(&globals, &qh).context("wl_compositor not available")?;
        let layer_shell =
            LayerShell::bind(&globals, &qh).context("zwlr_layer_shell_v1 not available")?;
        let shm = Shm::bind(&globals, &qh).context("wl_shm not available")?;
        let output_state = OutputState::new(&globals, &qh);
        let seat_state = SeatState::new(&globals, &qh);
        let registry_state = RegistryState::new(&globals);
        debug!("Bound compositor, layer shell, shm, outputs and seats");

        let pointer_source =
            HyprlandCursor::from_env().context("Global pointer position unavailable")?;
        info!(
            "Polling pointer from {} every {:?}",
            pointer_source.socket().display(),
            self.config.pointer.poll_interval()
        );

        let settings = self.config.detection.settings();
        debug!("Detection settings: {:?}", settings);
        let controller = Controller::new(
            settings,
            ControllerOptions {
                notify_on_success: self.config.capture.notify,
                ..ControllerOptions::default()
            },
        );

        let capture_manager = CaptureManager::new(self.tokio_runtime.handle());
        info!("Capture manager initialized");

        let mut state = WaylandState::new(
            conn.clone(),
            registry_state,
            compositor_state,
            layer_shell,
            shm,
            output_state,
            seat_state,
            self.config.clone(),
            controller,
            capture_manager,
            self.status.clone(),
            self.quit.clone(),
            self.tokio_runtime.handle().clone(),
        );

        let mut event_loop: EventLoop<WaylandState> =
            EventLoop::try_new().context("Failed to create event loop")?;
        let loop_handle = event_loop.handle();

        WaylandSource::new(conn, event_queue)
            .insert(loop_handle.clone())
            .map_err(|e| anyhow::anyhow!("Failed to insert Wayland source: {}", e.error))?;

        let (reading_tx, reading_rx) = channel::channel::<PointerReading>();
        let reading_qh = qh.clone();
        loop_handle
            .insert_source(reading_rx, move |event, _, state: &mut WaylandState| {
                if let Event::Msg(reading) = event {
                    state.on_pointer_reading(reading, &reading_qh);
                }
            })
            .map_err(|e| anyhow::anyhow!("Failed to insert pointer channel: {}", e.error))?;
        let mut poller = PointerPoller::spawn(
            pointer_source,
            self.config.pointer.poll_interval(),
            move |reading| reading_tx.send(reading).is_ok(),
        )
        .context("Failed to start pointer polling thread")?;

        let mut consecutive_render_failures = 0u32;
        loop {
            if state.should_exit() {
                info!("Exit requested, breaking event loop");
                break;
            }

            let timeout = dispatch_timeout(state.controller.next_deadline(), Instant::now());
            event_loop
                .dispatch(Some(timeout), &mut state)
                .context("Wayland event loop error")?;

            state.fire_due(&qh);
            state.poll_capture(&qh);

            let can_render = state.needs_redraw
                && state.surface.is_configured()
                && !state.surface.frame_callback_pending();
            if can_render {
                match state.render(&qh) {
                    Ok(()) => {
                        consecutive_render_failures = 0;
                        state.needs_redraw = false;
                    }
                    Err(e) => {
                        consecutive_render_failures += 1;
                        warn!(
                            "Rendering error (attempt {}/{}): {}",
                            consecutive_render_failures, MAX_RENDER_FAILURES, e
                        );
                        if consecutive_render_failures >= MAX_RENDER_FAILURES {
                            return Err(anyhow::anyhow!(
                                "Too many consecutive render failures ({}), exiting: {}",
                                consecutive_render_failures,
                                e
                            ));
                        }
                        state.needs_redraw = false;
                    }
                }
            }
        }

        poller.stop();
        for effect in state.controller.shutdown() {
            debug!("Discarding effect on shutdown: {:?}", effect);
        }
        info!("Wayland backend exiting");
        Ok(())
    }
}

/// Time to sleep in `dispatch`: until the next task is due, capped.
fn dispatch_timeout(next_deadline: Option<Instant>, now: Instant) -> Duration {
    next_deadline
        .map(|deadline| deadline.saturating_duration_since(now))
        .unwrap_or(MAX_DISPATCH_TIMEOUT)
        .min(MAX_DISPATCH_TIMEOUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_capped_without_deadline() {
        assert_eq!(dispatch_timeout(None, Instant::now()), MAX_DISPATCH_TIMEOUT);
    }

    #[test]
    fn timeout_tracks_near_deadline() {
        let now = Instant::now();
        let timeout = dispatch_timeout(Some(now + Duration::from_millis(30)), now);
        assert_eq!(timeout, Duration::from_millis(30));
    }

    #[test]
    fn overdue_deadline_does_not_block() {
        let now = Instant::now();
        let timeout = dispatch_timeout(Some(now), now + Duration::from_millis(5));
        assert_eq!(timeout, Duration::ZERO);
    }
}
