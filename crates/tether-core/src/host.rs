//! Collaborator interfaces consumed by the session lifecycle.
//!
//! These are the narrow seams toward the host editor, its tree view,
//! its recent-items list, and the notification/log subsystem. The
//! lifecycle only ever talks to these traits; concrete implementations
//! live in `tether-infrastructure` or in the embedding application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A document currently open in the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Absolute path of the document
    pub path: PathBuf,
}

/// Maps logical suffixes to absolute paths under the application's
/// snapshot data root.
pub trait PathResolver: Send + Sync {
    /// Returns the absolute path for `suffix` under the snapshot base
    /// directory, or the base directory itself when `suffix` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the platform data root cannot be
    /// determined.
    fn project_directory_path(&self, suffix: Option<&str>) -> Result<PathBuf>;
}

/// The host editor whose active root the session temporarily replaces.
#[async_trait]
pub trait HostEditor: Send + Sync {
    /// Returns the editor's currently active root path.
    async fn active_root(&self) -> Result<PathBuf>;

    /// Switches the editor's active root to `path`.
    ///
    /// # Errors
    ///
    /// Returns a `Host` error when the path is invalid or the editor
    /// rejects the switch.
    async fn set_active_root(&self, path: &Path) -> Result<()>;

    /// Returns the documents currently open in the editor.
    async fn open_documents(&self) -> Result<Vec<Document>>;
}

/// The remote file-tree view the session drives.
#[async_trait]
pub trait TreeView: Send + Sync {
    /// Clears the currently displayed tree. Callers treat failures as
    /// best-effort.
    async fn clear_current_tree(&self) -> Result<()>;
}

/// The host's recent-items list (recently opened project roots).
#[async_trait]
pub trait RecentItemsStore: Send + Sync {
    /// Returns the stored recent-item paths.
    async fn get(&self) -> Result<Vec<PathBuf>>;

    /// Replaces the stored recent-item paths.
    async fn set(&self, items: Vec<PathBuf>) -> Result<()>;

    /// Resolves `path` the way the host compares recent items
    /// (symlink resolution etc.). Falls back to the input when the
    /// path cannot be resolved.
    fn canonicalize(&self, path: &Path) -> PathBuf;
}

/// Fire-and-forget notification/log sink.
///
/// `record` has no return contract toward the lifecycle; failures stay
/// inside the sink.
pub trait NotificationSink: Send + Sync {
    /// Records `message`, marked as an error when `is_error` is set,
    /// and additionally persisted to the on-disk log when `persist`
    /// is set.
    fn record(&self, message: &str, is_error: bool, persist: bool);
}
