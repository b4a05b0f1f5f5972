use std::path::PathBuf;

use clap::{ArgAction, Parser};

use swirlcap::config::Config;
use swirlcap::daemon::Daemon;
use swirlcap::pointer::ReplayTrace;
use swirlcap::selection::{SELECTION_PADDING, SelectionRect};

#[derive(Parser, Debug)]
#[command(name = "swirlcap")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SWIRLCAP_GIT_HASH"), ")"),
    about = "Swirl the pointer to select and capture a screen region on Wayland"
)]
struct Cli {
    /// Run as daemon (listen for swirls, show tray icon)
    #[arg(long, short = 'd', action = ArgAction::SetTrue)]
    daemon: bool,

    /// Run the detector over a recorded pointer trace ("<ms> <x> <y>" per line)
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// Reset the [detection] settings to their defaults and exit
    #[arg(long, action = ArgAction::SetTrue)]
    reset_detection: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default configuration to {}", path.display());
    } else if cli.reset_detection {
        let mut config = Config::load()?;
        config.detection.reset_to_defaults();
        config.save()?;
        println!(
            "Detection settings reset in {}",
            Config::get_config_path()?.display()
        );
    } else if let Some(path) = cli.replay {
        replay(&path)?;
    } else if cli.daemon {
        if std::env::var("WAYLAND_DISPLAY").is_err() {
            log::error!("WAYLAND_DISPLAY not set - this application requires Wayland.");
            return Err(anyhow::anyhow!("Wayland environment required"));
        }

        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {:#}. Using defaults.", e);
                Config::default()
            }
        };

        log::info!("Starting in daemon mode");
        let mut daemon = Daemon::new(config);
        daemon.run()?;
    } else {
        println!("swirlcap: Swirl the pointer to capture a screen region");
        println!();
        println!("Usage:");
        println!("  swirlcap --daemon           Listen for swirl gestures (tray icon)");
        println!("  swirlcap --replay FILE      Run the detector over a recorded trace");
        println!("  swirlcap --init-config      Write ~/.config/swirlcap/config.toml");
        println!("  swirlcap --reset-detection  Restore default detection thresholds");
        println!("  swirlcap --help             Show help");
        println!();
        println!("While selecting:");
        println!("  Drag handles or the interior to adjust the region");
        println!("  Enter / double-click        Capture");
        println!("  Esc / right-click           Cancel");
        println!();
        println!("Requirements:");
        println!("  - Hyprland (global pointer position)");
        println!("  - wlr-layer-shell protocol support");
        println!("  - grim or xdg-desktop-portal for capture");
    }

    Ok(())
}

fn replay(path: &std::path::Path) -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {:#}. Using defaults.", e);
        Config::default()
    });
    let trace = ReplayTrace::load(path)?;
    let triggers = trace.detect(config.detection.settings());

    println!(
        "{} samples, {} trigger(s)",
        trace.len(),
        triggers.len()
    );
    for found in &triggers {
        let trigger = &found.trigger;
        let rect = SelectionRect::bounding(&trigger.points, SELECTION_PADDING);
        print!(
            "trigger at {} ms: {} points, {:.2} turns, radius {:.1}",
            found.offset.as_millis(),
            trigger.points.len(),
            trigger.turns(),
            trigger.radius
        );
        match rect {
            Some(rect) => println!(
                ", region {:.0},{:.0} {:.0}x{:.0}",
                rect.x, rect.y, rect.width, rect.height
            ),
            None => println!(),
        }
    }
    Ok(())
}
