//! Request execution: event classification, the task lifecycle, and the executor.

pub mod classifier;
pub mod error_mapper;
pub mod executor;
pub mod lifecycle;

pub use classifier::{classify, Classified};
pub use executor::{BridgeExecutor, ExecutionRequest, RequestContext};
pub use lifecycle::{LifecycleOutcome, TaskLifecycle};
