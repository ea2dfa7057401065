//! Unified path management for Tether data and configuration.
//!
//! # Directory Structure
//!
//! ```text
//! <config_dir>/tether/          # e.g. ~/.config/tether
//! ├── config.toml               # TetherConfig
//! └── recent_items.toml         # recent-items store
//!
//! <data_dir>/tether/            # e.g. ~/.local/share/tether
//! ├── projects/                 # snapshot base directory
//! │   └── <identity_key>/<snapshot_name>/
//! ├── trash/                    # recoverable trash for evicted snapshots
//! └── logs/
//!     └── error.log
//! ```

use std::path::PathBuf;

use tether_core::error::{Result, TetherError};
use tether_core::host::PathResolver;

/// Application directory name under the platform config/data roots.
const APP_DIR: &str = "tether";

/// Path resolution for the Tether workspace.
#[derive(Debug, Clone)]
pub struct TetherPaths {
    config_root: PathBuf,
    data_root: PathBuf,
}

impl TetherPaths {
    /// Resolves the platform config and data roots.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the platform directories cannot be
    /// determined (no home directory).
    pub fn discover() -> Result<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| TetherError::config("Cannot find the platform config directory"))?
            .join(APP_DIR);
        let data_root = dirs::data_dir()
            .ok_or_else(|| TetherError::config("Cannot find the platform data directory"))?
            .join(APP_DIR);
        Ok(Self {
            config_root,
            data_root,
        })
    }

    /// Creates path resolution rooted at explicit directories.
    ///
    /// Used by tests and by hosts that manage their own data root.
    pub fn rooted(config_root: PathBuf, data_root: PathBuf) -> Self {
        Self {
            config_root,
            data_root,
        }
    }

    /// Returns the snapshot base directory.
    pub fn projects_dir(&self) -> PathBuf {
        self.data_root.join("projects")
    }

    /// Returns the recoverable trash directory for evicted snapshots.
    pub fn trash_dir(&self) -> PathBuf {
        self.data_root.join("trash")
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_root.join("config.toml")
    }

    /// Returns the path to the recent-items file.
    pub fn recent_items_file(&self) -> PathBuf {
        self.config_root.join("recent_items.toml")
    }

    /// Returns the path to the persistent error log.
    pub fn error_log_file(&self) -> PathBuf {
        self.data_root.join("logs").join("error.log")
    }
}

impl PathResolver for TetherPaths {
    fn project_directory_path(&self, suffix: Option<&str>) -> Result<PathBuf> {
        let base = self.projects_dir();
        Ok(match suffix {
            Some(suffix) => base.join(suffix),
            None => base,
        })
    }
}
