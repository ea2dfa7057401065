//! Directory store capability trait.
//!
//! `DirectoryStore` is the narrow filesystem seam the session lifecycle
//! and the history evictor run against. Every operation is asynchronous
//! and fails independently; the production implementation lives in
//! `tether-infrastructure`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// One entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File name of the entry (for snapshots, the snapshot name)
    pub name: String,
    /// Absolute path of the entry
    pub path: PathBuf,
}

impl DirEntry {
    /// Creates an entry for `path`, deriving `name` from its last component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

/// Capability set over a directory-shaped filesystem.
///
/// Implementations should ensure thread-safety and asynchronous operation.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Checks whether `path` exists.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error when the parent cannot be read.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Creates the directory at `path`.
    ///
    /// Succeeds idempotently when the directory already exists.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error when creation fails.
    async fn create(&self, path: &Path) -> Result<()>;

    /// Lists the contents of the directory at `path`.
    ///
    /// # Returns
    ///
    /// Returns an empty vector for an empty directory, never a
    /// null-like value.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error when the directory cannot be read.
    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Moves `entry` to a recoverable trash area.
    ///
    /// This is not a permanent erase; the entry must remain recoverable
    /// by the user.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error when the move fails.
    async fn delete(&self, entry: &DirEntry) -> Result<()>;

    /// Renames `from` to `to`.
    ///
    /// A nonexistent source is a no-op success, not an error.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error when the rename itself fails.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Ensures the directory at `path` exists, creating it when absent.
///
/// Check-then-create; the inherent race with other writers is accepted
/// because `create` succeeds on an already existing directory.
pub async fn ensure_dir(store: &dyn DirectoryStore, path: &Path) -> Result<()> {
    if store.exists(path).await? {
        return Ok(());
    }
    store.create(path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_entry_from_path() {
        let entry = DirEntry::from_path("/base/acme_ftp.acme.com_bob/20240101120000");
        assert_eq!(entry.name, "20240101120000");
        assert_eq!(
            entry.path,
            PathBuf::from("/base/acme_ftp.acme.com_bob/20240101120000")
        );
    }
}
