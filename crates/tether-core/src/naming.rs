//! Snapshot name derivation.
//!
//! Snapshot directories are named with a second-granularity timestamp
//! token whose lexicographic order equals chronological order. The codec
//! is stateful so that two opens within the same second still receive
//! strictly increasing names.

use chrono::{DateTime, Duration, Utc};

/// chrono format string producing `YYYYMMDDHHmmss`.
pub const SNAPSHOT_NAME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Issues snapshot names from an injected clock reading.
///
/// Names are strictly increasing across calls on one codec instance:
/// when a reading would repeat (or precede) the previously issued name,
/// the codec advances one second past the last issued instant instead.
#[derive(Debug, Default)]
pub struct SnapshotClock {
    last_issued: Option<DateTime<Utc>>,
}

impl SnapshotClock {
    /// Creates a codec with no issued names yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the next snapshot name from `now`.
    ///
    /// Pure given the clock reading, except for the monotonicity state:
    /// repeated same-second readings are bumped forward so the returned
    /// name is always strictly greater than every name issued before.
    pub fn next(&mut self, now: DateTime<Utc>) -> String {
        let mut at = now;
        if let Some(last) = self.last_issued {
            // Same formatted second (or a clock running backwards) would
            // collide with an existing snapshot directory.
            if format_snapshot(&at) <= format_snapshot(&last) {
                at = last + Duration::seconds(1);
            }
        }
        self.last_issued = Some(at);
        format_snapshot(&at)
    }
}

fn format_snapshot(at: &DateTime<Utc>) -> String {
    at.format(SNAPSHOT_NAME_FORMAT).to_string()
}
