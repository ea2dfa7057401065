//! Configuration types for the session manager.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default maximum number of snapshot directories kept per identity key,
/// counting the one about to be created.
pub const DEFAULT_RETENTION_BOUND: usize = 10;

/// Default upper bound on one eviction batch, in milliseconds.
pub const DEFAULT_EVICTION_TIMEOUT_MS: u64 = 3000;

/// Tether configuration, loadable from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TetherConfig {
    /// Maximum snapshots retained per identity key
    #[serde(default = "default_retention_bound")]
    pub retention_bound: usize,
    /// Joint timeout for one eviction batch
    #[serde(default = "default_eviction_timeout_ms")]
    pub eviction_timeout_ms: u64,
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            retention_bound: DEFAULT_RETENTION_BOUND,
            eviction_timeout_ms: DEFAULT_EVICTION_TIMEOUT_MS,
        }
    }
}

impl TetherConfig {
    /// Returns the eviction timeout as a `Duration`.
    pub fn eviction_timeout(&self) -> Duration {
        Duration::from_millis(self.eviction_timeout_ms)
    }
}

fn default_retention_bound() -> usize {
    DEFAULT_RETENTION_BOUND
}

fn default_eviction_timeout_ms() -> u64 {
    DEFAULT_EVICTION_TIMEOUT_MS
}
