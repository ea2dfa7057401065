//! TOML-file-backed recent-items store.
//!
//! Caches the list in memory and rewrites the whole file on every
//! update; the list is small (recently opened project roots).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use tether_core::error::{Result, TetherError};
use tether_core::host::RecentItemsStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecentItemsFile {
    #[serde(default)]
    items: Vec<PathBuf>,
}

/// Recent-items store persisting to a TOML file.
pub struct TomlRecentItemsStore {
    file_path: PathBuf,
    cache: Mutex<Vec<PathBuf>>,
}

impl TomlRecentItemsStore {
    /// Creates a store backed by `file_path`, loading the existing list
    /// when the file is present.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing file cannot be read or parsed.
    pub async fn new(file_path: PathBuf) -> Result<Self> {
        let items = match fs::read_to_string(&file_path).await {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => {
                let parsed: RecentItemsFile = toml::from_str(&content)?;
                parsed.items
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(TetherError::io(format!(
                    "Failed to read recent items file '{}': {}",
                    file_path.display(),
                    e
                )))
            }
        };
        Ok(Self {
            file_path,
            cache: Mutex::new(items),
        })
    }

    async fn persist(&self, items: &[PathBuf]) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                TetherError::io(format!(
                    "Failed to create config directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let content = toml::to_string_pretty(&RecentItemsFile {
            items: items.to_vec(),
        })?;
        fs::write(&self.file_path, content).await.map_err(|e| {
            TetherError::io(format!(
                "Failed to write recent items file '{}': {}",
                self.file_path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl RecentItemsStore for TomlRecentItemsStore {
    async fn get(&self) -> Result<Vec<PathBuf>> {
        Ok(self.cache.lock().await.clone())
    }

    async fn set(&self, items: Vec<PathBuf>) -> Result<()> {
        self.persist(&items).await?;
        *self.cache.lock().await = items;
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
