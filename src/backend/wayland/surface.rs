//! Layer-surface lifetime and shared memory buffers for the selection overlay.

use anyhow::{Context, Result};
use log::{debug, info};
use smithay_client_toolkit::{
    shell::wlr_layer::LayerSurface,
    shm::{Shm, slot::SlotPool},
};

use crate::capture::OutputGeometry;

/// Buffers kept in the pool; one on screen, one being drawn.
pub const BUFFER_COUNT: usize = 2;

/// The overlay's layer surface, its buffer pool, and sizing state.
///
/// A surface exists only while a selection session is open.
#[derive(Default)]
pub struct SurfaceState {
    layer_surface: Option<LayerSurface>,
    output: Option<OutputGeometry>,
    pool: Option<SlotPool>,
    width: u32,
    height: u32,
    configured: bool,
    frame_callback_pending: bool,
}

impl SurfaceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a freshly created layer surface on `output`.
    pub fn set_layer_surface(&mut self, surface: LayerSurface, output: OutputGeometry) {
        self.layer_surface = Some(surface);
        self.output = Some(output);
        self.configured = false;
        self.frame_callback_pending = false;
    }

    /// Drops the layer surface, which unmaps it. Returns `false` if none was open.
    pub fn destroy(&mut self) -> bool {
        let had_surface = self.layer_surface.take().is_some();
        if had_surface {
            debug!("Layer surface destroyed");
        }
        self.configured = false;
        self.frame_callback_pending = false;
        had_surface
    }

    pub fn layer_surface(&self) -> Option<&LayerSurface> {
        self.layer_surface.as_ref()
    }

    /// Output the surface was created on.
    pub fn output(&self) -> Option<OutputGeometry> {
        self.output
    }

    /// Returns `true` if `surface` is the overlay's own `wl_surface`.
    pub fn owns(&self, surface: &wayland_client::protocol::wl_surface::WlSurface) -> bool {
        use smithay_client_toolkit::shell::WaylandSurface;
        self.layer_surface
            .as_ref()
            .is_some_and(|layer| layer.wl_surface() == surface)
    }

    /// Updates the surface dimensions, returning `true` if the size changed.
    ///
    /// A size change invalidates the buffer pool.
    pub fn update_dimensions(&mut self, width: u32, height: u32) -> bool {
        let changed = self.width != width || self.height != height;
        self.width = width;
        self.height = height;
        if changed {
            self.pool = None;
        }
        changed
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    pub fn is_configured(&self) -> bool {
        self.configured && self.layer_surface.is_some()
    }

    pub fn set_frame_callback_pending(&mut self, pending: bool) {
        self.frame_callback_pending = pending;
    }

    pub fn frame_callback_pending(&self) -> bool {
        self.frame_callback_pending
    }

    /// Ensures a shared memory pool of the current size exists.
    pub fn ensure_pool(&mut self, shm: &Shm) -> Result<&mut SlotPool> {
        if self.pool.is_none() {
            let buffer_size = (self.width * self.height * 4) as usize;
            let pool_size = buffer_size * BUFFER_COUNT;
            info!(
                "Creating new SlotPool ({}x{}, {} bytes, {} buffers)",
                self.width, self.height, pool_size, BUFFER_COUNT
            );
            let pool = SlotPool::new(pool_size, shm).context("Failed to create slot pool")?;
            self.pool = Some(pool);
        }

        self.pool
            .as_mut()
            .context("Buffer pool not initialized despite previous check")
    }
}
