//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: session state and descriptor (`SessionState`,
//!   `SessionDescriptor`)
//! - `event`: state-change payload and subscription channel
//!   (`StateChanged`, `SessionEvents`)
//! - `lifecycle`: the open/close orchestration (`SessionLifecycle`)

mod event;
mod lifecycle;
mod model;

// Re-export public API
pub use event::{SessionEvents, StateChanged};
pub use lifecycle::SessionLifecycle;
pub use model::{SessionDescriptor, SessionState};
