//! Configuration file support
//!
//! Settings are layered, highest priority first:
//! 1. CLI flags (and the environment variables clap maps onto them)
//! 2. The TOML config file
//! 3. Built-in defaults
//!
//! The file is optional. It lives at `$TRANSCRIPT_NAVIGATOR_CONFIG` or
//! `<config dir>/transcript-navigator/config.toml` unless `--config` names one.
//!
//! ```toml
//! data_path = "~/exports/conversation_analysis.json"
//! base_url = "https://viewer.example/"
//! max_file_size_mb = 64
//! log_file = "/tmp/transcript-navigator.log"
//! log_level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::utils::DEFAULT_MAX_FILE_SIZE_BYTES;

/// Base URL used for share links when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Log filter used when neither `RUST_LOG` nor a level is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// On-disk shape of the config file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsToml {
    pub data_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub max_file_size_mb: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Effective settings after defaults and the config file are applied
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Snapshot file or directory to load
    pub data_path: Option<PathBuf>,
    pub base_url: String,
    pub max_file_size_bytes: u64,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    /// The file these settings were read from, if any
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            source: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = Self::default();

        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(settings);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: SettingsToml = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.apply(file);
        settings.source = Some(path.to_path_buf());
        info!(path = %path.display(), "Loaded configuration from file");
        Ok(settings)
    }

    fn apply(&mut self, file: SettingsToml) {
        if let Some(data_path) = file.data_path {
            self.data_path = Some(expand_home(&data_path));
        }
        if let Some(base_url) = file.base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(mb) = file.max_file_size_mb.filter(|mb| *mb > 0) {
            self.max_file_size_bytes = mb.saturating_mul(1024 * 1024);
        }
        if let Some(log_file) = file.log_file {
            self.log_file = Some(expand_home(&log_file));
        }
        if let Some(level) = file.log_level.filter(|level| !level.trim().is_empty()) {
            self.log_level = level;
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE_BYTES);
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"
data_path = "/data/rows.json"
base_url = "https://viewer.example/"
max_file_size_mb = 2
log_file = "/tmp/navigator.log"
log_level = "debug"
"#,
        );

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.data_path, Some(PathBuf::from("/data/rows.json")));
        assert_eq!(settings.base_url, "https://viewer.example/");
        assert_eq!(settings.max_file_size_bytes, 2 * 1024 * 1024);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/navigator.log")));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let file = write_config("base_url = \"https://viewer.example/flow\"\n");

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.base_url, "https://viewer.example/flow");
        assert_eq!(settings.data_path, None);
        assert_eq!(settings.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_zero_size_and_blank_values_ignored() {
        let file = write_config("max_file_size_mb = 0\nbase_url = \"  \"\n");

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let file = write_config("max_file_size_mb = \"big\"\n");
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        let file = write_config("colour = \"blue\"\n");
        assert!(Settings::load_from(file.path()).is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/abs/rows.json")), PathBuf::from("/abs/rows.json"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/rows.json")), home.join("rows.json"));
        }
    }
}
