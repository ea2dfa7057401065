//! Snapshot history eviction.
//!
//! When the number of retained snapshots under an identity key would
//! exceed the retention bound, the oldest entries are moved to trash.
//! Planning is pure; the driver issues the deletions concurrently under
//! a single batch timeout.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use crate::error::{EvictionOutcome, Result, TetherError};
use crate::store::{DirEntry, DirectoryStore};

/// Computes which snapshot entries to evict for a listing of `entries`
/// under `retention_bound`.
///
/// The bound counts the snapshot about to be created, so nothing is
/// evicted while `entries.len() + 1 <= retention_bound`. Otherwise the
/// overflow-many oldest entries by snapshot-name order are returned.
/// Equal names keep their relative listing order (stable sort).
pub fn plan(entries: &[DirEntry], retention_bound: usize) -> Vec<DirEntry> {
    if entries.len() + 1 <= retention_bound {
        return Vec::new();
    }
    let overflow = entries.len() + 1 - retention_bound;
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted.truncate(overflow);
    sorted
}

/// Drives overflow eviction against a `DirectoryStore`.
pub struct HistoryEvictor {
    store: Arc<dyn DirectoryStore>,
    batch_timeout: Duration,
}

impl HistoryEvictor {
    /// Creates an evictor deleting through `store`, bounding each batch
    /// by `batch_timeout`.
    pub fn new(store: Arc<dyn DirectoryStore>, batch_timeout: Duration) -> Self {
        Self {
            store,
            batch_timeout,
        }
    }

    /// Evicts the overflow among `entries` for `retention_bound`.
    ///
    /// All planned deletions are issued concurrently, each in its own
    /// task, and joined under one timeout. A timeout or any individual
    /// failure fails the whole batch with an `Eviction` error carrying
    /// per-entry outcomes; deletions that already completed stay
    /// deleted, and deletions still in flight keep running in the
    /// background (they are reported as not completed).
    ///
    /// # Returns
    ///
    /// The number of entries deleted (zero when no eviction was needed).
    pub async fn evict_overflow(
        &self,
        entries: &[DirEntry],
        retention_bound: usize,
    ) -> Result<usize> {
        let doomed = plan(entries, retention_bound);
        if doomed.is_empty() {
            return Ok(0);
        }
        debug!(
            count = doomed.len(),
            bound = retention_bound,
            "evicting overflow snapshots"
        );

        // Until a task reports back, its entry counts as not completed.
        let mut outcomes: Vec<EvictionOutcome> = doomed
            .iter()
            .map(|entry| EvictionOutcome {
                name: entry.name.clone(),
                error: Some("did not complete within the eviction timeout".to_string()),
            })
            .collect();

        let mut pending = FuturesUnordered::new();
        for (idx, entry) in doomed.into_iter().enumerate() {
            let store = Arc::clone(&self.store);
            let task = tokio::spawn(async move { store.delete(&entry).await });
            pending.push(async move { (idx, task.await) });
        }

        let deadline = Instant::now() + self.batch_timeout;
        let mut timed_out = false;
        while !pending.is_empty() {
            match timeout_at(deadline, pending.next()).await {
                Ok(Some((idx, Ok(Ok(()))))) => outcomes[idx].error = None,
                Ok(Some((idx, Ok(Err(err))))) => outcomes[idx].error = Some(err.to_string()),
                Ok(Some((idx, Err(join_err)))) => {
                    outcomes[idx].error = Some(format!("delete task failed: {join_err}"))
                }
                Ok(None) => break,
                Err(_) => {
                    // Spawned deletions keep running; they are just no
                    // longer counted toward this batch.
                    timed_out = true;
                    break;
                }
            }
        }

        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        if timed_out || failed > 0 {
            warn!(failed, timed_out, "snapshot eviction batch failed");
            return Err(TetherError::Eviction { outcomes });
        }
        Ok(outcomes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    fn entry(name: &str) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            path: PathBuf::from(format!("/snapshots/{name}")),
        }
    }

    #[test]
    fn test_plan_no_overflow() {
        let entries = vec![entry("20240101120000"), entry("20240102120000")];
        // 2 existing + 1 new <= 3
        assert!(plan(&entries, 3).is_empty());
    }

    #[test]
    fn test_plan_boundary_is_inclusive() {
        let entries = vec![entry("20240101120000")];
        // 1 existing + 1 new == 2, still within the bound
        assert!(plan(&entries, 2).is_empty());
    }

    #[test]
    fn test_plan_selects_oldest_entries() {
        let entries = vec![
            entry("20240103120000"),
            entry("20240101120000"),
            entry("20240102120000"),
        ];
        let doomed = plan(&entries, 2);
        assert_eq!(doomed.len(), 2);
        assert_eq!(doomed[0].name, "20240101120000");
        assert_eq!(doomed[1].name, "20240102120000");
    }

    #[test]
    fn test_plan_tie_break_is_stable() {
        let first = DirEntry {
            name: "20240101120000".to_string(),
            path: PathBuf::from("/a/20240101120000"),
        };
        let second = DirEntry {
            name: "20240101120000".to_string(),
            path: PathBuf::from("/b/20240101120000"),
        };
        let doomed = plan(&[first.clone(), second.clone()], 2);
        assert_eq!(doomed, vec![first]);
    }

    /// Store that records deletions and can fail or stall on demand.
    struct ScriptedStore {
        deleted: Mutex<Vec<String>>,
        fail_names: HashSet<String>,
        stall_names: HashSet<String>,
    }

    impl ScriptedStore {
        fn new() -> Self {
            Self {
                deleted: Mutex::new(Vec::new()),
                fail_names: HashSet::new(),
                stall_names: HashSet::new(),
            }
        }
    }

    #[async_trait]
    impl DirectoryStore for ScriptedStore {
        async fn exists(&self, _path: &Path) -> Result<bool> {
            Ok(true)
        }

        async fn create(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        async fn list(&self, _path: &Path) -> Result<Vec<DirEntry>> {
            Ok(Vec::new())
        }

        async fn delete(&self, entry: &DirEntry) -> Result<()> {
            if self.stall_names.contains(&entry.name) {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            if self.fail_names.contains(&entry.name) {
                return Err(TetherError::io(format!("cannot delete {}", entry.name)));
            }
            self.deleted.lock().unwrap().push(entry.name.clone());
            Ok(())
        }

        async fn rename(&self, _from: &Path, _to: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_evict_overflow_deletes_exactly_the_oldest() {
        let store = Arc::new(ScriptedStore::new());
        let evictor = HistoryEvictor::new(store.clone(), Duration::from_secs(3));
        let entries = vec![
            entry("20240103120000"),
            entry("20240101120000"),
            entry("20240102120000"),
        ];

        let deleted = evictor.evict_overflow(&entries, 2).await.unwrap();
        assert_eq!(deleted, 2);

        let mut names = store.deleted.lock().unwrap().clone();
        names.sort();
        assert_eq!(names, vec!["20240101120000", "20240102120000"]);
    }

    #[tokio::test]
    async fn test_evict_overflow_noop_within_bound() {
        let store = Arc::new(ScriptedStore::new());
        let evictor = HistoryEvictor::new(store.clone(), Duration::from_secs(3));
        let entries = vec![entry("20240101120000")];

        let deleted = evictor.evict_overflow(&entries, 10).await.unwrap();
        assert_eq!(deleted, 0);
        assert!(store.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_evict_overflow_reports_partial_failure() {
        let mut store = ScriptedStore::new();
        store.fail_names.insert("20240101120000".to_string());
        let store = Arc::new(store);
        let evictor = HistoryEvictor::new(store.clone(), Duration::from_secs(3));
        let entries = vec![
            entry("20240101120000"),
            entry("20240102120000"),
            entry("20240103120000"),
        ];

        let err = evictor.evict_overflow(&entries, 2).await.unwrap_err();
        match err {
            TetherError::Eviction { outcomes } => {
                assert_eq!(outcomes.len(), 2);
                let failed: Vec<_> =
                    outcomes.iter().filter(|o| !o.succeeded()).collect();
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].name, "20240101120000");
            }
            other => panic!("expected eviction error, got {other:?}"),
        }
        // The sibling delete still went through, no rollback.
        assert_eq!(
            store.deleted.lock().unwrap().as_slice(),
            &["20240102120000".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_overflow_times_out() {
        let mut store = ScriptedStore::new();
        store.stall_names.insert("20240101120000".to_string());
        let store = Arc::new(store);
        let evictor = HistoryEvictor::new(store, Duration::from_millis(100));
        let entries = vec![entry("20240101120000"), entry("20240102120000")];

        let err = evictor.evict_overflow(&entries, 1).await.unwrap_err();
        match err {
            TetherError::Eviction { outcomes } => {
                let stalled = outcomes
                    .iter()
                    .find(|o| o.name == "20240101120000")
                    .unwrap();
                assert!(stalled
                    .error
                    .as_deref()
                    .unwrap()
                    .contains("did not complete"));
            }
            other => panic!("expected eviction error, got {other:?}"),
        }
    }
}
