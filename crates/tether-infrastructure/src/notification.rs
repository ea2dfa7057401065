//! Notification sink backed by tracing and an on-disk error log.
//!
//! Keeps a bounded in-memory history for the host's log panel and
//! appends persisted entries to `error.log`. Recording is
//! fire-and-forget: failures to write the log file are traced, never
//! surfaced.

use chrono::Local;
use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info, warn};

use tether_core::host::NotificationSink;

/// Maximum number of notices retained in memory.
pub const NOTICE_HISTORY_LIMIT: usize = 100;

/// Timestamp format shown alongside notices, e.g. `14:03:59 Jan 01`.
const NOTICE_TIMESTAMP_FORMAT: &str = "%H:%M:%S %b %d";

/// One recorded notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Local wall-clock stamp at recording time
    pub timestamp: String,
    pub message: String,
    pub is_error: bool,
}

/// `NotificationSink` implementation routing to `tracing`.
pub struct TracingNotificationSink {
    /// Append target for persisted notices, `None` to disable
    log_file: Option<PathBuf>,
    history: Mutex<VecDeque<Notice>>,
}

impl TracingNotificationSink {
    /// Creates a sink persisting to `log_file` when asked to.
    pub fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            log_file,
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the retained notices, oldest first.
    pub fn history(&self) -> Vec<Notice> {
        self.history.lock().unwrap().iter().cloned().collect()
    }

    fn append_to_file(&self, notice: &Notice) {
        let Some(path) = &self.log_file else {
            return;
        };
        let line = if notice.is_error {
            format!("{} ERROR {}\n", notice.timestamp, notice.message)
        } else {
            format!("{} {}\n", notice.timestamp, notice.message)
        };
        if let Err(err) = append_line(path, &line) {
            warn!(%err, path = %path.display(), "failed to append to the error log");
        }
    }
}

fn append_line(path: &PathBuf, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line.as_bytes())
}

impl NotificationSink for TracingNotificationSink {
    fn record(&self, message: &str, is_error: bool, persist: bool) {
        let notice = Notice {
            timestamp: Local::now().format(NOTICE_TIMESTAMP_FORMAT).to_string(),
            message: message.to_string(),
            is_error,
        };

        if is_error {
            error!("{message}");
        } else {
            info!("{message}");
        }

        {
            let mut history = self.history.lock().unwrap();
            history.push_back(notice.clone());
            while history.len() > NOTICE_HISTORY_LIMIT {
                history.pop_front();
            }
        }

        if persist {
            self.append_to_file(&notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_history_records_in_order() {
        let sink = TracingNotificationSink::new(None);
        sink.record("first", false, false);
        sink.record("second", true, false);

        let history = sink.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].message, "first");
        assert!(!history[0].is_error);
        assert_eq!(history[1].message, "second");
        assert!(history[1].is_error);
    }

    #[test]
    fn test_history_is_bounded() {
        let sink = TracingNotificationSink::new(None);
        for i in 0..(NOTICE_HISTORY_LIMIT + 10) {
            sink.record(&format!("notice {i}"), false, false);
        }
        let history = sink.history();
        assert_eq!(history.len(), NOTICE_HISTORY_LIMIT);
        // The oldest entries were dropped.
        assert_eq!(history[0].message, "notice 10");
    }

    #[test]
    fn test_persisted_errors_are_appended() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("logs").join("error.log");
        let sink = TracingNotificationSink::new(Some(log.clone()));

        sink.record("kept in memory only", true, false);
        sink.record("written to disk", true, true);

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content.contains("ERROR written to disk"));
        assert!(!content.contains("kept in memory only"));
    }

    #[test]
    fn test_persist_without_log_file_is_fine() {
        let sink = TracingNotificationSink::new(None);
        sink.record("nowhere to go", true, true);
        assert_eq!(sink.history().len(), 1);
    }
}
