//! Bridges a session-based agent runtime to the A2A task lifecycle.
//!
//! An inbound A2A message is resolved to a runtime session, translated into
//! runtime content, and run. The runtime's execution events are classified
//! and forwarded as task status updates until the final event completes the
//! task with an artifact.

pub mod card;
pub mod config;
pub mod errors;
pub mod execution;
pub mod logging;
pub mod models;
pub mod runtime;
pub mod sessions;
pub mod task;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use a2a_types as a2a;
pub use errors::{BridgeError, BridgeResult};
