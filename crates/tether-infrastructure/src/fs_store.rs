//! tokio::fs-backed directory store.
//!
//! Deletion is a move into a recoverable trash directory rather than a
//! permanent erase; evicted snapshots stay restorable by the user.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use tether_core::error::{Result, TetherError};
use tether_core::store::{DirEntry, DirectoryStore};

/// Directory store over the local filesystem.
pub struct FsDirectoryStore {
    /// Destination for trashed entries
    trash_dir: PathBuf,
}

impl FsDirectoryStore {
    /// Creates a store trashing into `trash_dir`.
    ///
    /// The trash directory is created lazily on first deletion.
    pub fn new(trash_dir: PathBuf) -> Self {
        Self { trash_dir }
    }

    /// Returns the trash directory this store moves deletions into.
    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    /// Computes a unique trash slot for `entry`.
    ///
    /// The uuid suffix keeps repeated evictions of equally named
    /// snapshots (from different identity keys) from colliding.
    fn trash_slot(&self, entry: &DirEntry) -> PathBuf {
        self.trash_dir
            .join(format!("{}.{}", entry.name, Uuid::new_v4()))
    }
}

#[async_trait]
impl DirectoryStore for FsDirectoryStore {
    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path).await.map_err(|e| {
            TetherError::io(format!(
                "Failed to check existence of '{}': {}",
                path.display(),
                e
            ))
        })
    }

    async fn create(&self, path: &Path) -> Result<()> {
        // Idempotent: an already existing directory is a success.
        if self.exists(path).await? {
            return Ok(());
        }
        fs::create_dir_all(path).await.map_err(|e| {
            TetherError::io(format!(
                "Failed to create directory '{}': {}",
                path.display(),
                e
            ))
        })
    }

    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut read_dir = fs::read_dir(path).await.map_err(|e| {
            TetherError::io(format!(
                "Failed to read directory '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(|e| {
            TetherError::io(format!(
                "Failed to read an entry of '{}': {}",
                path.display(),
                e
            ))
        })? {
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            });
        }
        Ok(entries)
    }

    async fn delete(&self, entry: &DirEntry) -> Result<()> {
        fs::create_dir_all(&self.trash_dir).await.map_err(|e| {
            TetherError::io(format!(
                "Failed to create trash directory '{}': {}",
                self.trash_dir.display(),
                e
            ))
        })?;

        let slot = self.trash_slot(entry);
        debug!(from = %entry.path.display(), to = %slot.display(), "moving entry to trash");
        fs::rename(&entry.path, &slot).await.map_err(|e| {
            TetherError::io(format!(
                "Failed to move '{}' to trash: {}",
                entry.path.display(),
                e
            ))
        })
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        // A missing source is not an error for callers.
        if !self.exists(from).await? {
            return Ok(());
        }
        fs::rename(from, to).await.map_err(|e| {
            TetherError::io(format!(
                "Failed to rename '{}' to '{}': {}",
                from.display(),
                to.display(),
                e
            ))
        })
    }
}
