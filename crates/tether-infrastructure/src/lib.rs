//! Filesystem-backed implementations of the Tether collaborator
//! interfaces: the tokio::fs directory store with recoverable trash,
//! platform path resolution, the TOML recent-items store, config
//! loading, and the tracing-backed notification sink.

pub mod fs_store;
pub mod notification;
pub mod paths;
pub mod recent_store;
pub mod toml_config;

#[cfg(test)]
mod test_session_fs;

pub use crate::fs_store::FsDirectoryStore;
pub use crate::notification::{Notice, TracingNotificationSink};
pub use crate::paths::TetherPaths;
pub use crate::recent_store::TomlRecentItemsStore;
pub use crate::toml_config::{load_config, save_config};
