use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TRANSCRIPT_NAVIGATOR_CONFIG";

const APP_DIR_NAME: &str = "transcript-navigator";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the config file path: `$TRANSCRIPT_NAVIGATOR_CONFIG`, else
/// `<platform config dir>/transcript-navigator/config.toml`
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(explicit));
    }

    let config_dir = dirs::config_dir().context("Failed to determine platform config directory")?;
    Ok(config_path_in(&config_dir))
}

fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}
