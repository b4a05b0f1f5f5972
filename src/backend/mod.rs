use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;

use crate::config::Config;
use crate::daemon::SharedStatus;

pub mod wayland;

/// Run the Wayland listener until `quit` is raised.
///
/// `status` mirrors the controller's [`crate::app::AppStatus`] for the tray.
pub fn run_wayland(config: Config, quit: Arc<AtomicBool>, status: SharedStatus) -> Result<()> {
    let mut backend = wayland::WaylandBackend::new(config, quit, status)?;
    backend.run()
}
