//! Session lifecycle orchestration.
//!
//! `SessionLifecycle` owns the open/closed state machine described in
//! the module docs: opening a session prepares the snapshot directory
//! tree for the given remote identity, evicts overflow history, creates
//! the new snapshot directory and hands it to the host editor; closing
//! reverses the bookkeeping while deliberately leaving the snapshot on
//! disk.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::config::TetherConfig;
use crate::error::{Result, TetherError};
use crate::evictor::HistoryEvictor;
use crate::host::{Document, HostEditor, NotificationSink, PathResolver, RecentItemsStore, TreeView};
use crate::identity::ServerIdentity;
use crate::naming::SnapshotClock;
use crate::recent;
use crate::session::event::{SessionEvents, StateChanged};
use crate::session::model::{SessionDescriptor, SessionState};
use crate::store::{ensure_dir, DirectoryStore};

/// Mutable session slot. The lifecycle's only shared mutable state;
/// guarded by one mutex that is held across the whole of `open()` and
/// `close()` so a second call can never interleave with one in flight.
struct SessionSlot {
    state: SessionState,
    descriptor: Option<SessionDescriptor>,
    clock: SnapshotClock,
}

/// Manages the single process-wide mirror session.
pub struct SessionLifecycle {
    store: Arc<dyn DirectoryStore>,
    paths: Arc<dyn PathResolver>,
    editor: Arc<dyn HostEditor>,
    tree_view: Arc<dyn TreeView>,
    recent_items: Arc<dyn RecentItemsStore>,
    notifications: Arc<dyn NotificationSink>,
    evictor: HistoryEvictor,
    config: TetherConfig,
    events: SessionEvents,
    slot: Mutex<SessionSlot>,
}

impl SessionLifecycle {
    /// Creates a closed lifecycle wired to its collaborators.
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        paths: Arc<dyn PathResolver>,
        editor: Arc<dyn HostEditor>,
        tree_view: Arc<dyn TreeView>,
        recent_items: Arc<dyn RecentItemsStore>,
        notifications: Arc<dyn NotificationSink>,
        config: TetherConfig,
    ) -> Self {
        let evictor = HistoryEvictor::new(Arc::clone(&store), config.eviction_timeout());
        Self {
            store,
            paths,
            editor,
            tree_view,
            recent_items,
            notifications,
            evictor,
            config,
            events: SessionEvents::default(),
            slot: Mutex::new(SessionSlot {
                state: SessionState::Closed,
                descriptor: None,
                clock: SnapshotClock::new(),
            }),
        }
    }

    /// Subscribes to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.events.subscribe()
    }

    /// Opens a mirror session for `identity`.
    ///
    /// Runs the strictly ordered open sequence: ensure the base
    /// directory, ensure the identity-scoped directory, list existing
    /// snapshots, evict overflow, create the new snapshot directory,
    /// record the editor's current root and switch the editor onto the
    /// snapshot. Only when every step succeeded does the state become
    /// `Open` and a `StateChanged` event fire.
    ///
    /// # Errors
    ///
    /// `AlreadyOpen` when a session is open; otherwise the first failing
    /// step's error. On failure the existing state is untouched, no
    /// event is emitted and no descriptor is published; every aborting
    /// error is also routed to the notification sink.
    pub async fn open(&self, identity: ServerIdentity) -> Result<()> {
        let mut slot = self.slot.lock().await;
        match self.open_sequence(&mut slot, identity).await {
            Ok(descriptor) => {
                let snapshot_path = descriptor.snapshot_path.clone();
                debug!(path = %snapshot_path.display(), "mirror session opened");
                slot.descriptor = Some(descriptor);
                slot.state = SessionState::Open;
                self.events.emit(StateChanged {
                    state: SessionState::Open,
                    directory: Some(snapshot_path),
                });
                Ok(())
            }
            Err(err) => {
                error!(%err, "failed to open the mirror session");
                self.notifications.record(
                    &format!("Failed to open the mirror session: {err}"),
                    true,
                    true,
                );
                Err(err)
            }
        }
    }

    /// The fallible part of `open()`; the caller publishes the
    /// descriptor and transitions state only on success.
    async fn open_sequence(
        &self,
        slot: &mut SessionSlot,
        identity: ServerIdentity,
    ) -> Result<SessionDescriptor> {
        if slot.state == SessionState::Open {
            return Err(TetherError::AlreadyOpen);
        }

        let base_dir = self.paths.project_directory_path(None)?;
        ensure_dir(self.store.as_ref(), &base_dir).await?;

        let key = identity.identity_key();
        let identity_dir = self.paths.project_directory_path(Some(key.as_str()))?;
        ensure_dir(self.store.as_ref(), &identity_dir).await?;

        let entries = self.store.list(&identity_dir).await?;

        let snapshot_name = slot.clock.next(Utc::now());
        self.evictor
            .evict_overflow(&entries, self.config.retention_bound)
            .await?;

        let snapshot_path = identity_dir.join(&snapshot_name);
        self.store.create(&snapshot_path).await?;

        let previous_editor_root = self.editor.active_root().await?;
        self.editor.set_active_root(&snapshot_path).await?;

        Ok(SessionDescriptor {
            identity,
            snapshot_path,
            previous_editor_root,
        })
    }

    /// Closes the current session.
    ///
    /// Clears the tree view (best-effort), removes the snapshot
    /// directory from the host's recent-items list, transitions to
    /// `Closed` and emits a `StateChanged` event. The snapshot directory
    /// itself is intentionally left on disk.
    ///
    /// Never fails from the caller's perspective: sub-step failures are
    /// logged and recorded, not surfaced. Calling `close()` while
    /// already closed is a no-op.
    pub async fn close(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        if slot.state == SessionState::Closed {
            return Ok(());
        }

        if let Err(err) = self.tree_view.clear_current_tree().await {
            warn!(%err, "failed to clear the remote tree view");
            self.notifications
                .record(&format!("Failed to clear the remote tree view: {err}"), true, false);
        }

        let descriptor = slot.descriptor.take();
        if let Some(descriptor) = &descriptor {
            if let Err(err) = self.prune_recent_items(descriptor).await {
                warn!(%err, "failed to prune the recent items list");
                self.notifications.record(
                    &format!("Failed to prune the recent items list: {err}"),
                    true,
                    false,
                );
            }
        }

        slot.state = SessionState::Closed;
        self.events.emit(StateChanged {
            state: SessionState::Closed,
            directory: descriptor.map(|d| d.snapshot_path),
        });
        Ok(())
    }

    /// Restores the editor root that was active before the session
    /// opened, without changing session state.
    ///
    /// Matches the original host behavior: the editor is reverted away
    /// from the snapshot while `is_open()` keeps reporting true. No-op
    /// while closed.
    pub async fn close_project(&self) -> Result<()> {
        let slot = self.slot.lock().await;
        if slot.state != SessionState::Open {
            return Ok(());
        }
        let descriptor = slot
            .descriptor
            .as_ref()
            .ok_or_else(|| TetherError::internal("open session without a descriptor"))?;
        self.editor
            .set_active_root(&descriptor.previous_editor_root)
            .await
    }

    /// Returns true while a session is open.
    pub async fn is_open(&self) -> bool {
        self.slot.lock().await.state == SessionState::Open
    }

    /// Returns the identity of the open session, `None` while closed.
    pub async fn current_identity(&self) -> Option<ServerIdentity> {
        self.slot
            .lock()
            .await
            .descriptor
            .as_ref()
            .map(|d| d.identity.clone())
    }

    /// Returns the documents open in the host editor while a session is
    /// open, an empty list while closed.
    pub async fn open_documents(&self) -> Result<Vec<Document>> {
        if !self.is_open().await {
            return Ok(Vec::new());
        }
        self.editor.open_documents().await
    }

    async fn prune_recent_items(&self, descriptor: &SessionDescriptor) -> Result<()> {
        let recents = self.recent_items.get().await?;
        let pruned = recent::prune(&recents, &descriptor.snapshot_path, |p| {
            self.recent_items.canonicalize(p)
        });
        self.recent_items.set(pruned).await
    }
}
