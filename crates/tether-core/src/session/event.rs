//! State-change notifications.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::broadcast;

use super::model::SessionState;

/// Payload emitted on every session state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChanged {
    /// The state entered by the transition
    pub state: SessionState,
    /// The snapshot directory of the session the transition concerns,
    /// when one exists
    pub directory: Option<PathBuf>,
}

/// Typed subscription channel for [`StateChanged`] events.
///
/// Emission is synchronous at the transition point; subscribers that
/// lag beyond the channel capacity miss the oldest events.
#[derive(Debug)]
pub struct SessionEvents {
    tx: broadcast::Sender<StateChanged>,
}

impl SessionEvents {
    /// Creates a channel buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.tx.subscribe()
    }

    /// Emits `event` to all current subscribers. Having no subscribers
    /// is not an error.
    pub fn emit(&self, event: StateChanged) {
        let _ = self.tx.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
