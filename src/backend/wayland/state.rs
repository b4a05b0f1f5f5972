// Holds the live Wayland protocol state shared by the backend loop and the handler
// submodules; routes controller effects to the overlay, the tray status and capture.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::{
        SeatState,
        pointer::{CursorIcon, ThemedPointer},
    },
    shell::{
        WaylandSurface,
        wlr_layer::{Anchor, KeyboardInteractivity, Layer, LayerShell},
    },
    shm::Shm,
};
use wayland_client::{
    Connection, QueueHandle,
    protocol::{wl_output, wl_shm},
};

use crate::{
    app::{AppEffect, Controller},
    capture::{CaptureManager, CaptureOutcome, CaptureRegion, OutputGeometry},
    config::Config,
    daemon::SharedStatus,
    draw,
    input::ClickCounter,
    notification,
    pointer::{PointerError, PointerReading},
    selection::{CursorHint, EditorEvent, SelectionRect},
    ui,
    util::Point,
};

use super::surface::SurfaceState;

/// Internal Wayland state shared across modules.
pub(super) struct WaylandState {
    // Wayland protocol objects
    pub(super) conn: Connection,
    pub(super) registry_state: RegistryState,
    pub(super) compositor_state: CompositorState,
    pub(super) layer_shell: LayerShell,
    pub(super) shm: Shm,
    pub(super) output_state: OutputState,
    pub(super) seat_state: SeatState,
    pub(super) themed_pointer: Option<ThemedPointer>,

    // Overlay surface and buffers
    pub(super) surface: SurfaceState,
    pub(super) needs_redraw: bool,

    pub(super) config: Config,
    pub(super) controller: Controller,

    // Overlay pointer tracking, in global logical coordinates
    pub(super) pointer_position: Point,
    pub(super) primary_down: bool,
    pub(super) clicks: ClickCounter,

    // Global pointer polling
    pointer_failing: bool,

    // Capture
    pub(super) capture_manager: CaptureManager,
    /// Requests submitted whose outcome has not been picked up yet.
    pending_captures: usize,
    last_output: Option<OutputGeometry>,

    pub(super) status: SharedStatus,
    pub(super) quit: Arc<AtomicBool>,
    pub(super) tokio_handle: tokio::runtime::Handle,
}

impl WaylandState {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        conn: Connection,
        registry_state: RegistryState,
        compositor_state: CompositorState,
        layer_shell: LayerShell,
        shm: Shm,
        output_state: OutputState,
        seat_state: SeatState,
        config: Config,
        controller: Controller,
        capture_manager: CaptureManager,
        status: SharedStatus,
        quit: Arc<AtomicBool>,
        tokio_handle: tokio::runtime::Handle,
    ) -> Self {
        Self {
            conn,
            registry_state,
            compositor_state,
            layer_shell,
            shm,
            output_state,
            seat_state,
            themed_pointer: None,
            surface: SurfaceState::new(),
            needs_redraw: false,
            config,
            controller,
            pointer_position: Point::default(),
            primary_down: false,
            clicks: ClickCounter::new(),
            pointer_failing: false,
            capture_manager,
            pending_captures: 0,
            last_output: None,
            status,
            quit,
            tokio_handle,
        }
    }

    pub(super) fn should_exit(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    /// Feeds one reading from the pointer poller to the detector.
    pub(super) fn on_pointer_reading(&mut self, reading: PointerReading, qh: &QueueHandle<Self>) {
        match reading {
            Ok(point) => {
                if self.pointer_failing {
                    info!("Pointer source recovered");
                    self.pointer_failing = false;
                }
                if self.controller.is_selecting() {
                    return;
                }
                let effects = self.controller.on_pointer_sample(point, Instant::now());
                self.apply_effects(effects, qh);
            }
            Err(err) => self.report_pointer_error(err),
        }
    }

    fn report_pointer_error(&mut self, err: PointerError) {
        if !self.pointer_failing {
            warn!("Pointer source failed: {}", err);
            self.pointer_failing = true;
        } else {
            debug!("Pointer source still failing: {}", err);
        }
    }

    /// Forwards an overlay input event to the controller.
    pub(super) fn editor_event(&mut self, event: EditorEvent, qh: &QueueHandle<Self>) {
        let effects = self.controller.on_editor_event(event, Instant::now());
        self.apply_effects(effects, qh);
    }

    /// Runs due scheduler tasks.
    pub(super) fn fire_due(&mut self, qh: &QueueHandle<Self>) {
        let effects = self.controller.fire_due(Instant::now());
        self.apply_effects(effects, qh);
    }

    /// Picks up every finished capture, oldest first.
    pub(super) fn poll_capture(&mut self, qh: &QueueHandle<Self>) {
        while self.pending_captures > 0 {
            let Some(outcome) = self.capture_manager.try_take_result() else {
                break;
            };
            self.pending_captures -= 1;
            self.finish_capture(outcome, qh);
        }
    }

    fn finish_capture(&mut self, outcome: CaptureOutcome, qh: &QueueHandle<Self>) {
        if let CaptureOutcome::Failed(ref error) = outcome {
            error!("Region capture failed: {}", error);
        }
        let effects = self.controller.on_capture_finished(&outcome, Instant::now());
        self.apply_effects(effects, qh);
    }

    pub(super) fn apply_effects(&mut self, effects: Vec<AppEffect>, qh: &QueueHandle<Self>) {
        let mut abandon_session = false;
        for effect in effects {
            match effect {
                AppEffect::OpenOverlay { rect } => {
                    if let Err(err) = self.open_overlay(rect, qh) {
                        error!("Failed to open selection overlay: {:#}", err);
                        abandon_session = true;
                    }
                }
                AppEffect::CloseOverlay => self.close_overlay(),
                AppEffect::Redraw => self.needs_redraw = true,
                AppEffect::SetCursor(hint) => self.set_cursor(hint),
                AppEffect::RunCapture { rect } => self.start_capture(rect, qh),
                AppEffect::SetStatus(status) => {
                    debug!("Status -> {:?}", status);
                    self.status.store(status as u8, Ordering::Release);
                }
                AppEffect::Notify {
                    summary,
                    body,
                    icon,
                } => {
                    notification::send_notification_async(
                        &self.tokio_handle,
                        summary,
                        body,
                        Some(icon),
                    );
                }
            }
        }

        // Without a surface the session can never finish.
        if abandon_session {
            self.editor_event(EditorEvent::SecondaryClick, qh);
        }
    }

    /// Output whose logical area contains `point`, falling back to the first one.
    fn output_at(&self, point: Point) -> Option<(wl_output::WlOutput, OutputGeometry)> {
        let mut fallback = None;
        for output in self.output_state.outputs() {
            let Some(info) = self.output_state.info(&output) else {
                continue;
            };
            let (Some((x, y)), Some((width, height))) = (info.logical_position, info.logical_size)
            else {
                continue;
            };
            if width <= 0 || height <= 0 {
                continue;
            }
            let geometry = OutputGeometry {
                x,
                y,
                width: width as u32,
                height: height as u32,
            };
            if output_rect(&geometry).contains(point) {
                return Some((output, geometry));
            }
            if fallback.is_none() {
                fallback = Some((output, geometry));
            }
        }
        fallback
    }

    fn open_overlay(&mut self, rect: SelectionRect, qh: &QueueHandle<Self>) -> Result<()> {
        let (output, geometry) = self
            .output_at(rect.center())
            .context("No output with a known logical geometry")?;

        info!(
            "Opening overlay on output at ({}, {}) {}x{}",
            geometry.x, geometry.y, geometry.width, geometry.height
        );

        let wl_surface = self.compositor_state.create_surface(qh);
        let layer_surface = self.layer_shell.create_layer_surface(
            qh,
            wl_surface,
            Layer::Overlay,
            Some("swirlcap"),
            Some(&output),
        );
        layer_surface.set_anchor(Anchor::all());
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::Exclusive);
        layer_surface.set_size(0, 0);
        layer_surface.set_exclusive_zone(-1);
        layer_surface.commit();

        self.surface.set_layer_surface(layer_surface, geometry);
        self.last_output = Some(geometry);
        self.primary_down = false;
        self.clicks.reset();
        self.needs_redraw = true;
        Ok(())
    }

    fn close_overlay(&mut self) {
        if self.surface.destroy() {
            info!("Selection overlay closed");
        }
        self.primary_down = false;
        self.needs_redraw = false;
    }

    pub(super) fn set_cursor(&self, hint: CursorHint) {
        let Some(pointer) = self.themed_pointer.as_ref() else {
            return;
        };
        if let Err(err) = pointer.set_cursor(&self.conn, cursor_icon(hint)) {
            debug!("Failed to set cursor {:?}: {}", hint, err);
        }
    }

    /// Converts a surface-local position into global logical coordinates.
    pub(super) fn to_global(&self, local: (f64, f64)) -> Point {
        let (ox, oy) = self
            .surface
            .output()
            .map(|o| (f64::from(o.x), f64::from(o.y)))
            .unwrap_or((0.0, 0.0));
        Point::new(local.0 + ox, local.1 + oy)
    }

    fn start_capture(&mut self, rect: SelectionRect, qh: &QueueHandle<Self>) {
        let Some(output) = self.last_output else {
            self.finish_capture(
                CaptureOutcome::Failed("No output recorded for the selection".to_string()),
                qh,
            );
            return;
        };

        let Some(visible) = rect.intersection(&output_rect(&output)) else {
            self.finish_capture(
                CaptureOutcome::Failed("Selected region lies outside the output".to_string()),
                qh,
            );
            return;
        };

        let local = visible.translated(-f64::from(output.x), -f64::from(output.y));
        let region = CaptureRegion::from_selection(&local, Some(output));
        let destination = self.config.capture.destination.capture_destination();
        let save_config = self.config.capture.file_save_config();

        info!("Requesting capture of {}", region.grim_geometry());
        match self
            .capture_manager
            .request_capture(region, destination, save_config)
        {
            Ok(()) => self.pending_captures += 1,
            Err(err) => self.finish_capture(CaptureOutcome::Failed(err.to_string()), qh),
        }
    }

    pub(super) fn render(&mut self, qh: &QueueHandle<Self>) -> Result<()> {
        let Some(editor) = self.controller.editor() else {
            return Ok(());
        };
        let rect = editor.rect();
        let output = self.surface.output().context("Overlay has no output")?;
        let local = rect.translated(-f64::from(output.x), -f64::from(output.y));

        let width = self.surface.width();
        let height = self.surface.height();

        let (buffer, canvas) = {
            let pool = self.surface.ensure_pool(&self.shm)?;
            pool.create_buffer(
                width as i32,
                height as i32,
                (width * 4) as i32,
                wl_shm::Format::Argb8888,
            )
            .context("Failed to create buffer")?
        };

        // SAFETY: `canvas` is the SlotPool slice for this buffer, exactly
        // width * height * 4 bytes with a width * 4 stride, matching ARgb32.
        // `cairo_surface` and `ctx` are dropped before the buffer is attached,
        // so cairo never touches the memory after the compositor owns it.
        let cairo_surface = unsafe {
            cairo::ImageSurface::create_for_data_unsafe(
                canvas.as_mut_ptr(),
                cairo::Format::ARgb32,
                width as i32,
                height as i32,
                (width * 4) as i32,
            )
            .context("Failed to create Cairo surface")?
        };

        let ctx = cairo::Context::new(&cairo_surface).context("Failed to create Cairo context")?;
        draw::clear(&ctx);
        draw::render_selection(&ctx, &local, f64::from(width), f64::from(height));
        ui::render_size_label(&ctx, &local, f64::from(height));
        ui::render_help_hint(&ctx, f64::from(width), f64::from(height));

        cairo_surface.flush();
        drop(ctx);
        drop(cairo_surface);

        let wl_surface = self
            .surface
            .layer_surface()
            .context("Layer surface not created")?
            .wl_surface();
        wl_surface.attach(Some(buffer.wl_buffer()), 0, 0);
        wl_surface.damage_buffer(0, 0, width as i32, height as i32);
        wl_surface.frame(qh, wl_surface.clone());
        wl_surface.commit();
        self.surface.set_frame_callback_pending(true);

        Ok(())
    }
}

fn output_rect(output: &OutputGeometry) -> SelectionRect {
    SelectionRect::new(
        f64::from(output.x),
        f64::from(output.y),
        f64::from(output.width),
        f64::from(output.height),
    )
}

fn cursor_icon(hint: CursorHint) -> CursorIcon {
    match hint {
        CursorHint::Default => CursorIcon::Default,
        CursorHint::Move => CursorIcon::Move,
        CursorHint::ResizeNorthWest => CursorIcon::NwResize,
        CursorHint::ResizeNorth => CursorIcon::NResize,
        CursorHint::ResizeNorthEast => CursorIcon::NeResize,
        CursorHint::ResizeWest => CursorIcon::WResize,
        CursorHint::ResizeEast => CursorIcon::EResize,
        CursorHint::ResizeSouthWest => CursorIcon::SwResize,
        CursorHint::ResizeSouth => CursorIcon::SResize,
        CursorHint::ResizeSouthEast => CursorIcon::SeResize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_rect_uses_logical_origin() {
        let output = OutputGeometry {
            x: 1920,
            y: 0,
            width: 2560,
            height: 1440,
        };
        let rect = output_rect(&output);
        assert!(rect.contains(Point::new(1920.0, 0.0)));
        assert!(!rect.contains(Point::new(1919.0, 10.0)));
        assert!(!rect.contains(Point::new(4480.0, 10.0)));
    }

    #[test]
    fn every_hint_has_a_distinct_cursor() {
        let hints = [
            CursorHint::Default,
            CursorHint::Move,
            CursorHint::ResizeNorthWest,
            CursorHint::ResizeNorth,
            CursorHint::ResizeNorthEast,
            CursorHint::ResizeWest,
            CursorHint::ResizeEast,
            CursorHint::ResizeSouthWest,
            CursorHint::ResizeSouth,
            CursorHint::ResizeSouthEast,
        ];
        let icons: Vec<CursorIcon> = hints.into_iter().map(cursor_icon).collect();
        for (i, a) in icons.iter().enumerate() {
            for b in &icons[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
