//! Session state and descriptor models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::identity::ServerIdentity;

/// The two states of the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No mirror session is active
    Closed,
    /// A mirror session is active and owns the editor root
    Open,
}

/// In-memory record of the currently open session.
///
/// Owned exclusively by the lifecycle; created on a successful open and
/// discarded on close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescriptor {
    /// Identity of the remote endpoint this session mirrors
    pub identity: ServerIdentity,
    /// The snapshot directory created for this session
    pub snapshot_path: PathBuf,
    /// The editor root that was active before the session opened
    pub previous_editor_root: PathBuf,
}
