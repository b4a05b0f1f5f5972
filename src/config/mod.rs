//! Configuration file support for swirlcap.
//!
//! Settings live in `~/.config/swirlcap/config.toml`. A missing file, or a
//! missing section, means defaults.

pub mod enums;
pub mod types;

pub use enums::SaveDestination;
pub use types::{CaptureConfig, DetectionConfig, PointerConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Accepted pointer polling interval, in milliseconds.
const POLL_INTERVAL_RANGE: (u64, u64) = (1, 100);

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [detection]
/// window_duration = 1.4
/// min_points = 25
/// trigger_angle = 1.5
/// min_radius = 30.0
/// cooldown = 2.5
///
/// [capture]
/// destination = "both"
/// filename_template = "swirl_%Y%m%d_%H%M%S"
///
/// [pointer]
/// poll_interval_ms = 8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Swirl recognition thresholds
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Where and how captures are delivered
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Pointer polling
    #[serde(default)]
    pub pointer: PointerConfig,
}

impl Config {
    /// Clamps values that are not covered by the detection fallback rules.
    ///
    /// Detection values are left untouched; they are range-checked when read.
    fn validate_and_clamp(&mut self) {
        let (min, max) = POLL_INTERVAL_RANGE;
        if !(min..=max).contains(&self.pointer.poll_interval_ms) {
            log::warn!(
                "Invalid poll_interval_ms {}, clamping to {}-{} range",
                self.pointer.poll_interval_ms,
                min,
                max
            );
            self.pointer.poll_interval_ms = self.pointer.poll_interval_ms.clamp(min, max);
        }

        if self.capture.filename_template.trim().is_empty() {
            log::warn!("Empty filename_template, falling back to the default");
            self.capture.filename_template = CaptureConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("swirlcap");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if the file is missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `path`, or returns defaults if it does not exist.
    ///
    /// Each section is read on its own: a section with a wrongly typed value
    /// is replaced by its defaults (logged at warn) and the others are kept.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    fn from_toml_str(text: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(text)?;
        Ok(Self {
            detection: take_section(&mut table, "detection"),
            capture: take_section(&mut table, "capture"),
            pointer: take_section(&mut table, "pointer"),
        })
    }

    /// Saves the configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Serializes the config to TOML and writes it to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Writes the documented example config to the default path.
    ///
    /// # Errors
    /// Returns an error if a config file already exists or it cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;
        Self::create_default_file_at(&config_path)?;
        Ok(config_path)
    }

    pub fn create_default_file_at(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                path.display()
            ));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, include_str!("../../config.example.toml"))?;

        info!("Created default config at {}", path.display());
        Ok(())
    }

    /// JSON schema of the config file, for editor tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Deserializes `[name]`, falling back to defaults when it is absent or malformed.
fn take_section<T>(table: &mut toml::Table, name: &str) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    let Some(value) = table.remove(name) else {
        return T::default();
    };
    value.try_into().unwrap_or_else(|err| {
        log::warn!("Invalid [{}] section, using its defaults: {}", name, err);
        T::default()
    })
}
