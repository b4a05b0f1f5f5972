/// Daemon mode: pointer listener with tray indicator and signal handling
use anyhow::{Context, Result, anyhow};
use ksni::TrayMethods;
use log::{debug, error, info, warn};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::app::AppStatus;
use crate::backend;
use crate::config::Config;

/// Status indicator shared between the backend and the tray thread.
pub type SharedStatus = Arc<AtomicU8>;

type BackendRunner = dyn Fn(Config, Arc<AtomicBool>, SharedStatus) -> Result<()> + Send + Sync;

const TRAY_START_TIMEOUT: Duration = Duration::from_secs(5);
const TRAY_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct Daemon {
    config: Config,
    should_quit: Arc<AtomicBool>,
    status: SharedStatus,
    backend_runner: Arc<BackendRunner>,
    tray_thread: Option<JoinHandle<()>>,
}

pub(crate) struct SwirlTray {
    status: SharedStatus,
    quit_flag: Arc<AtomicBool>,
    config_path: Option<PathBuf>,
}

impl SwirlTray {
    fn new(status: SharedStatus, quit_flag: Arc<AtomicBool>, config_path: Option<PathBuf>) -> Self {
        Self {
            status,
            quit_flag,
            config_path,
        }
    }

    fn current_status(&self) -> AppStatus {
        AppStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    fn open_config(&self) {
        let Some(path) = self.config_path.as_ref() else {
            warn!("No config path available to open");
            return;
        };

        if !path.exists() {
            if let Err(err) = Config::create_default_file_at(path) {
                warn!("Failed to create config at {}: {}", path.display(), err);
            }
        }

        let mut command = Command::new("xdg-open");
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match command.spawn() {
            Ok(child) => info!("Opened {} (pid: {})", path.display(), child.id()),
            Err(err) => error!("Failed to run xdg-open for {}: {}", path.display(), err),
        }
    }
}

impl ksni::Tray for SwirlTray {
    fn id(&self) -> String {
        "swirlcap".into()
    }

    fn title(&self) -> String {
        self.current_status().glyph().to_string()
    }

    fn icon_name(&self) -> String {
        match self.current_status() {
            AppStatus::Idle => "view-refresh",
            AppStatus::Selecting => "edit-cut",
            AppStatus::Captured => "camera-photo",
        }
        .into()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            icon_name: self.icon_name(),
            icon_pixmap: vec![],
            title: format!(
                "Swirlcap {} {}",
                env!("CARGO_PKG_VERSION"),
                self.current_status().glyph()
            ),
            description: "Swirl the pointer to select a region".into(),
        }
    }

    fn category(&self) -> ksni::Category {
        ksni::Category::ApplicationStatus
    }

    fn status(&self) -> ksni::Status {
        ksni::Status::Active
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        use ksni::menu::*;

        vec![
            StandardItem {
                label: "Swirl the pointer to capture".to_string(),
                enabled: false,
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Open Config".to_string(),
                icon_name: "preferences-desktop".into(),
                activate: Box::new(|this: &mut Self| {
                    this.open_config();
                }),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".to_string(),
                icon_name: "window-close".into(),
                activate: Box::new(|this: &mut Self| {
                    this.quit_flag.store(true, Ordering::Release);
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}

impl Daemon {
    pub fn new(config: Config) -> Self {
        Self::with_backend_runner_internal(
            config,
            Arc::new(|config, quit, status| backend::run_wayland(config, quit, status)),
        )
    }

    fn with_backend_runner_internal(config: Config, backend_runner: Arc<BackendRunner>) -> Self {
        Self {
            config,
            should_quit: Arc::new(AtomicBool::new(false)),
            status: Arc::new(AtomicU8::new(AppStatus::Idle as u8)),
            backend_runner,
            tray_thread: None,
        }
    }

    #[cfg(test)]
    pub fn with_backend_runner(config: Config, backend_runner: Arc<BackendRunner>) -> Self {
        Self::with_backend_runner_internal(config, backend_runner)
    }

    /// Run the daemon until SIGINT/SIGTERM, the tray's Quit item, or a backend error.
    pub fn run(&mut self) -> Result<()> {
        info!("Starting swirlcap daemon");

        let mut signals =
            Signals::new([SIGTERM, SIGINT]).context("Failed to register signal handler")?;
        let quit_flag = self.should_quit.clone();

        // Lives until process exit; `forever()` has no shutdown hook.
        thread::spawn(move || {
            for sig in signals.forever() {
                match sig {
                    SIGTERM | SIGINT => {
                        info!(
                            "Received {} - initiating graceful shutdown",
                            if sig == SIGTERM { "SIGTERM" } else { "SIGINT" }
                        );
                        quit_flag.store(true, Ordering::Release);
                    }
                    _ => warn!("Received unexpected signal: {}", sig),
                }
            }
        });

        match start_system_tray(self.status.clone(), self.should_quit.clone()) {
            Ok(handle) => self.tray_thread = Some(handle),
            Err(err) => warn!("Continuing without system tray: {:#}", err),
        }

        info!("Daemon ready - swirl the pointer to select a region");
        let result = self.run_backend();

        info!("Daemon shutting down");
        self.should_quit.store(true, Ordering::Release);
        if let Some(handle) = self.tray_thread.take() {
            match handle.join() {
                Ok(()) => info!("System tray thread joined"),
                Err(err) => warn!("System tray thread panicked: {:?}", err),
            }
        }
        result
    }

    /// Blocks in the backend until the quit flag is raised.
    fn run_backend(&self) -> Result<()> {
        let result = (self.backend_runner)(
            self.config.clone(),
            self.should_quit.clone(),
            self.status.clone(),
        );
        self.status.store(AppStatus::Idle as u8, Ordering::Release);
        result
    }
}

#[cfg(test)]
impl Daemon {
    pub fn test_status(&self) -> AppStatus {
        AppStatus::from_u8(self.status.load(Ordering::Acquire))
    }
}

fn start_system_tray(status: SharedStatus, quit_flag: Arc<AtomicBool>) -> Result<JoinHandle<()>> {
    let config_path = Config::get_config_path().ok();
    let tray_quit_flag = quit_flag.clone();
    let tray_status = status.clone();
    let tray = SwirlTray::new(status, tray_quit_flag.clone(), config_path);
    let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

    info!("Spawning system tray runtime thread...");

    let ready_thread_tx = ready_tx.clone();
    let tray_thread = thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                report_tray_readiness(
                    &ready_thread_tx,
                    Err(anyhow!(
                        "Failed to create Tokio runtime for system tray: {e}"
                    )),
                );
                return;
            }
        };

        rt.block_on(async {
            match tray.spawn().await {
                Ok(handle) => {
                    info!("System tray spawned successfully");
                    report_tray_readiness(&ready_thread_tx, Ok(()));

                    let mut shown = tray_status.load(Ordering::Acquire);
                    loop {
                        tokio::time::sleep(TRAY_POLL_INTERVAL).await;
                        if tray_quit_flag.load(Ordering::Acquire) {
                            info!("Quit signal received - shutting down system tray");
                            let _ = handle.shutdown().await;
                            break;
                        }

                        let current = tray_status.load(Ordering::Acquire);
                        if current != shown {
                            shown = current;
                            debug!("Tray status -> {:?}", AppStatus::from_u8(current));
                            // Properties are re-read from the shared status.
                            handle.update(|_| {}).await;
                        }
                    }
                }
                Err(e) => {
                    report_tray_readiness(&ready_thread_tx, Err(anyhow!("System tray error: {e}")));
                }
            }
        });
    });

    drop(ready_tx);

    match ready_rx.recv_timeout(TRAY_START_TIMEOUT) {
        Ok(result) => {
            result?;
            info!("System tray thread started");
            Ok(tray_thread)
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!("Timed out waiting for system tray to start");
            quit_flag.store(true, Ordering::Release);
            let _ = tray_thread.join();
            // The flag is shared with the backend; this path must not stop it.
            quit_flag.store(false, Ordering::Release);
            Err(anyhow!("Timed out waiting for system tray to start"))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            let _ = tray_thread.join();
            Err(anyhow!(
                "System tray thread exited before signaling readiness"
            ))
        }
    }
}

fn report_tray_readiness(tx: &mpsc::Sender<Result<()>>, result: Result<()>) {
    if let Err(err) = tx.send(result) {
        debug!(
            "System tray readiness receiver dropped before signal could be delivered: {}",
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksni::{Tray, menu::MenuItem};
    use std::sync::atomic::AtomicUsize;

    fn tray_with(status: AppStatus) -> (SwirlTray, Arc<AtomicBool>) {
        let quit = Arc::new(AtomicBool::new(false));
        let status = Arc::new(AtomicU8::new(status as u8));
        (SwirlTray::new(status, quit.clone(), None), quit)
    }

    fn activate_menu_item(tray: &mut SwirlTray, label: &str) {
        for item in tray.menu() {
            if let MenuItem::Standard(standard) = item {
                if standard.label.contains(label) {
                    let activate = standard.activate;
                    activate(tray);
                    return;
                }
            }
        }
        panic!("Menu item '{label}' not found");
    }

    #[test]
    fn backend_runner_receives_shared_flags() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let runner: Arc<BackendRunner> = Arc::new(move |config, quit, status| {
            assert_eq!(config, Config::default());
            assert!(!quit.load(Ordering::SeqCst));
            status.store(AppStatus::Captured as u8, Ordering::SeqCst);
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let daemon = Daemon::with_backend_runner(Config::default(), runner);

        daemon.run_backend().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Status is reset once the backend exits.
        assert_eq!(daemon.test_status(), AppStatus::Idle);
    }

    #[test]
    fn backend_errors_propagate() {
        let runner: Arc<BackendRunner> = Arc::new(|_, _, _| Err(anyhow!("no compositor")));
        let daemon = Daemon::with_backend_runner(Config::default(), runner);
        let err = daemon.run_backend().unwrap_err();
        assert!(err.to_string().contains("no compositor"));
    }

    #[test]
    fn tray_title_follows_status() {
        let (tray, _) = tray_with(AppStatus::Idle);
        assert_eq!(tray.title(), "🌀");

        tray.status
            .store(AppStatus::Selecting as u8, Ordering::SeqCst);
        assert_eq!(tray.title(), AppStatus::Selecting.glyph());

        tray.status.store(AppStatus::Captured as u8, Ordering::SeqCst);
        assert_eq!(tray.title(), "📸");
    }

    #[test]
    fn tray_hint_item_is_disabled() {
        let (tray, _) = tray_with(AppStatus::Idle);
        let first = tray.menu().into_iter().next();
        match first {
            Some(MenuItem::Standard(item)) => assert!(!item.enabled),
            _ => panic!("expected a standard hint item first"),
        }
    }

    #[test]
    fn tray_quit_action_sets_quit_flag() {
        let (mut tray, quit) = tray_with(AppStatus::Idle);
        activate_menu_item(&mut tray, "Quit");
        assert!(quit.load(Ordering::SeqCst));
    }
}
