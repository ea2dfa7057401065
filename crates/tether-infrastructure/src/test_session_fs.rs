//! End-to-end session lifecycle tests over the real filesystem store.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    use tether_core::config::TetherConfig;
    use tether_core::error::Result;
    use tether_core::host::{Document, HostEditor, RecentItemsStore, TreeView};
    use tether_core::identity::ServerIdentity;
    use tether_core::session::SessionLifecycle;

    use crate::fs_store::FsDirectoryStore;
    use crate::notification::TracingNotificationSink;
    use crate::paths::TetherPaths;

    struct StubEditor {
        root: Mutex<PathBuf>,
    }

    #[async_trait]
    impl HostEditor for StubEditor {
        async fn active_root(&self) -> Result<PathBuf> {
            Ok(self.root.lock().unwrap().clone())
        }

        async fn set_active_root(&self, path: &Path) -> Result<()> {
            *self.root.lock().unwrap() = path.to_path_buf();
            Ok(())
        }

        async fn open_documents(&self) -> Result<Vec<Document>> {
            Ok(Vec::new())
        }
    }

    struct StubTreeView;

    #[async_trait]
    impl TreeView for StubTreeView {
        async fn clear_current_tree(&self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubRecentItems {
        items: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl RecentItemsStore for StubRecentItems {
        async fn get(&self) -> Result<Vec<PathBuf>> {
            Ok(self.items.lock().unwrap().clone())
        }

        async fn set(&self, items: Vec<PathBuf>) -> Result<()> {
            *self.items.lock().unwrap() = items;
            Ok(())
        }

        fn canonicalize(&self, path: &Path) -> PathBuf {
            std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
    }

    fn lifecycle(temp: &TempDir, retention_bound: usize) -> (SessionLifecycle, TetherPaths) {
        let paths = TetherPaths::rooted(
            temp.path().join("config"),
            temp.path().join("data"),
        );
        let store = Arc::new(FsDirectoryStore::new(paths.trash_dir()));
        let lifecycle = SessionLifecycle::new(
            store,
            Arc::new(paths.clone()),
            Arc::new(StubEditor {
                root: Mutex::new(temp.path().join("workspace")),
            }),
            Arc::new(StubTreeView),
            Arc::new(StubRecentItems::default()),
            Arc::new(TracingNotificationSink::new(Some(paths.error_log_file()))),
            TetherConfig {
                retention_bound,
                ..TetherConfig::default()
            },
        );
        (lifecycle, paths)
    }

    fn snapshot_names(identity_dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(identity_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_repeated_opens_rotate_history_on_disk() {
        let temp = TempDir::new().unwrap();
        let (lifecycle, paths) = lifecycle(&temp, 2);
        let identity = ServerIdentity::new("acme", "ftp.acme.com", "bob");
        let identity_dir = paths.projects_dir().join(identity.identity_key());

        for _ in 0..3 {
            lifecycle.open(identity.clone()).await.unwrap();
            lifecycle.close().await.unwrap();
        }

        // Exactly the retention bound survives, and the evicted snapshot
        // was moved to trash rather than erased.
        let names = snapshot_names(&identity_dir);
        assert_eq!(names.len(), 2);

        let trashed: Vec<String> = std::fs::read_dir(paths.trash_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(trashed.len(), 1);
        // The evicted one is older than everything still retained.
        let evicted = trashed[0].split('.').next().unwrap().to_string();
        assert!(names.iter().all(|n| *n > evicted));
    }

    #[tokio::test]
    async fn test_open_builds_the_directory_tree_from_scratch() {
        let temp = TempDir::new().unwrap();
        let (lifecycle, paths) = lifecycle(&temp, 10);
        let identity = ServerIdentity::new("acme", "ftp.acme.com", "bob");

        lifecycle.open(identity.clone()).await.unwrap();

        let identity_dir = paths.projects_dir().join("acme_ftp.acme.com_bob");
        assert!(identity_dir.is_dir());
        assert_eq!(snapshot_names(&identity_dir).len(), 1);
        assert_eq!(lifecycle.current_identity().await, Some(identity));
    }
}
