//! The protocol-facing side of a request: the task sink and its A2A implementation.

pub mod event_queue;
pub mod projection;
pub mod status_mapper;
pub mod updater;

use crate::errors::BridgeResult;
use a2a_types::Part;
use async_trait::async_trait;

pub use event_queue::{TaskEvent, TaskEventQueue, TaskEventReceiver};
pub use projection::TaskProjection;
pub use updater::TaskUpdater;

/// Receiver of task lifecycle transitions for one request.
///
/// The lifecycle controller drives a sink through
/// `submit → start_work → post_status_update* → post_artifact_and_complete | fail`.
/// Implementations persist or stream the resulting protocol events.
#[async_trait]
pub trait TaskSink: Send + Sync {
    /// Whether the protocol layer already knows this request's task.
    async fn has_existing_task(&self) -> bool;

    async fn submit(&self) -> BridgeResult<()>;

    async fn start_work(&self) -> BridgeResult<()>;

    /// Publishes a `working` status carrying an agent message with `parts`.
    async fn post_status_update(&self, parts: Vec<Part>) -> BridgeResult<()>;

    /// Attaches `parts` as the response artifact and completes the task.
    async fn post_artifact_and_complete(&self, parts: Vec<Part>) -> BridgeResult<()>;

    /// Fails the task with a human-readable reason.
    async fn fail(&self, message: &str) -> BridgeResult<()>;
}
