//! Core domain logic for Tether, the mirror-session snapshot directory
//! manager.
//!
//! A mirror session gives a remote editing endpoint a local working
//! directory: opening a session creates a fresh timestamped snapshot
//! directory under the endpoint's identity key, prunes the rotating
//! snapshot history down to the retention bound, and hands the new
//! directory to the host editor. Closing reverses the bookkeeping while
//! leaving the snapshot on disk.
//!
//! This crate holds the domain models, the collaborator traits, and the
//! orchestration; filesystem-backed implementations live in
//! `tether-infrastructure`.

pub mod config;
pub mod error;
pub mod evictor;
pub mod host;
pub mod identity;
pub mod naming;
pub mod recent;
pub mod session;
pub mod store;

// Re-export common error type
pub use error::TetherError;
