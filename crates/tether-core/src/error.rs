//! Error types for the Tether session manager.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a single snapshot deletion inside an eviction batch.
///
/// `error` is `None` when the deletion completed successfully, otherwise
/// it carries a human-readable description of the failure (including
/// "did not complete" for deletions still in flight when the batch
/// timeout fired).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionOutcome {
    /// Snapshot name of the entry the deletion targeted
    pub name: String,
    /// Failure description, `None` on success
    pub error: Option<String>,
}

impl EvictionOutcome {
    /// Returns true if this entry was deleted successfully.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// A shared error type for the entire Tether workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TetherError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Snapshot history eviction failed or timed out
    #[error("Eviction error: {} of {} deletions did not complete",
        failed_count(.outcomes), .outcomes.len())]
    Eviction { outcomes: Vec<EvictionOutcome> },

    /// The host editor rejected a root switch
    #[error("Host editor error: {0}")]
    Host(String),

    /// A session is already open
    #[error("A mirror session is already open")]
    AlreadyOpen,

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TetherError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is an eviction error
    pub fn is_eviction(&self) -> bool {
        matches!(self, Self::Eviction { .. })
    }

    /// Check if this is a host editor error
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}

impl From<std::io::Error> for TetherError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TetherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TetherError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TetherError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

fn failed_count(outcomes: &[EvictionOutcome]) -> usize {
    outcomes.iter().filter(|o| !o.succeeded()).count()
}

/// A type alias for `Result<T, TetherError>`.
pub type Result<T> = std::result::Result<T, TetherError>;
