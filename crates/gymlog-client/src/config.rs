//! Configuration file loading.
//!
//! Reads a [`ClientConfig`] from a JSON file, by default
//! `<config dir>/gymlog/config.json`.

use gymlog_core::config::ClientConfig;
use gymlog_core::error::{GymlogError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The default configuration file path: `<config dir>/gymlog/config.json`.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        GymlogError::config("could not determine the user configuration directory")
    })?;
    Ok(config_dir.join("gymlog").join("config.json"))
}

/// Loads configuration from `path`, or from the default location when
/// `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        GymlogError::config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        GymlogError::config(format!(
            "invalid configuration file {}: {}",
            path.display(),
            e
        ))
    })
}
