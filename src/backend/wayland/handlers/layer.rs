// Responds to layer-shell configure/close events for the selection overlay.
use log::info;
use smithay_client_toolkit::shell::wlr_layer::{
    LayerShellHandler, LayerSurface, LayerSurfaceConfigure,
};
use wayland_client::{Connection, QueueHandle};

use crate::input::Key;
use crate::selection::EditorEvent;

use super::super::state::WaylandState;

impl LayerShellHandler for WaylandState {
    fn closed(&mut self, _conn: &Connection, qh: &QueueHandle<Self>, _layer: &LayerSurface) {
        info!("Layer surface closed by compositor");
        if self.controller.is_selecting() {
            self.editor_event(EditorEvent::Key(Key::Escape), qh);
        }
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _layer: &LayerSurface,
        configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        info!(
            "Layer surface configured: {}x{}",
            configure.new_size.0, configure.new_size.1
        );

        let (width, height) = match (configure.new_size, self.surface.output()) {
            ((0, _) | (_, 0), Some(output)) => (output.width, output.height),
            (size, _) => size,
        };

        if width > 0 && height > 0 && self.surface.update_dimensions(width, height) {
            info!("Surface size changed - recreating SlotPool");
        }

        self.surface.set_configured(true);
        self.needs_redraw = true;
    }
}
