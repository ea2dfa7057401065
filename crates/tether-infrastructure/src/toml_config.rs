//! Loading and saving of the TOML configuration file.

use std::fs;

use tether_core::config::TetherConfig;
use tether_core::error::{Result, TetherError};

use crate::paths::TetherPaths;

/// Loads the configuration from `config.toml`.
///
/// A missing or empty file yields the defaults; a present but malformed
/// file is an error (silent fallback would mask typos in the user's
/// retention settings).
pub fn load_config(paths: &TetherPaths) -> Result<TetherConfig> {
    let path = paths.config_file();
    if !path.exists() {
        return Ok(TetherConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        TetherError::io(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    if content.trim().is_empty() {
        return Ok(TetherConfig::default());
    }
    Ok(toml::from_str(&content)?)
}

/// Saves `config` to `config.toml`, creating the config directory when
/// needed.
pub fn save_config(paths: &TetherPaths, config: &TetherConfig) -> Result<()> {
    let path = paths.config_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TetherError::io(format!(
                "Failed to create config directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(&path, content).map_err(|e| {
        TetherError::io(format!(
            "Failed to write config file '{}': {}",
            path.display(),
            e
        ))
    })
}
