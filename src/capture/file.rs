//! Writing captured PNGs to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use super::types::CaptureError;

/// Default chrono template for capture file names.
pub const DEFAULT_FILENAME_TEMPLATE: &str = "swirl_%Y%m%d_%H%M%S";

/// Desktop directory, falling back to the home directory.
pub fn default_save_directory() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Where and how a capture is written.
#[derive(Debug, Clone)]
pub struct FileSaveConfig {
    pub save_directory: PathBuf,
    /// Chrono format string, expanded with the local time.
    pub filename_template: String,
    /// Extension appended to the expanded template.
    pub format: String,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            format: "png".to_string(),
        }
    }
}

impl FileSaveConfig {
    /// File name for a capture taken now.
    pub fn file_name(&self) -> String {
        generate_filename(&self.filename_template, &self.format)
    }
}

pub fn generate_filename(template: &str, format: &str) -> String {
    format!("{}.{}", Local::now().format(template), format)
}

/// Creates `directory` if needed and returns its canonical form when it has one.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, CaptureError> {
    if !directory.is_dir() {
        log::info!("Creating capture directory {}", directory.display());
        fs::create_dir_all(directory)?;
    }
    Ok(directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf()))
}

/// Writes `image_data` under the configured directory, readable by the owner only.
pub fn save_screenshot(
    image_data: &[u8],
    config: &FileSaveConfig,
) -> Result<PathBuf, CaptureError> {
    let path = ensure_directory_exists(&config.save_directory)?.join(config.file_name());

    fs::write(&path, image_data)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    log::info!("Saved {} bytes to {}", image_data.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn filename_follows_template() {
        let filename = generate_filename("swirl_%Y", "png");
        assert!(filename.starts_with("swirl_"));
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), "swirl_2026.png".len());
    }

    #[test]
    fn default_config_uses_swirl_template() {
        let config = FileSaveConfig::default();
        assert_eq!(config.format, "png");
        assert_eq!(config.filename_template, DEFAULT_FILENAME_TEMPLATE);
        assert!(!config.save_directory.as_os_str().is_empty());
    }

    #[test]
    fn save_creates_directory_and_restricts_permissions() {
        let temp = TempDir::new().unwrap();
        let config = FileSaveConfig {
            save_directory: temp.path().join("nested").join("captures"),
            filename_template: "capture".to_string(),
            format: "png".to_string(),
        };

        let path = save_screenshot(b"png-bytes", &config).unwrap();
        assert!(path.ends_with("capture.png"));
        assert_eq!(fs::read(&path).unwrap(), b"png-bytes");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
