use crate::errors::{BridgeError, BridgeResult};
use a2a_types::{Part, Task, TaskState};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::event_queue::{TaskEvent, TaskEventQueue};
use super::status_mapper::{
    agent_message, can_transition, create_artifact_update_event, create_status_update_event,
    response_artifact, status,
};
use super::TaskSink;

/// [`TaskSink`] that publishes A2A update events for one task.
///
/// Tracks the task's state so that illegal transitions are rejected before
/// anything reaches the queue. A second terminal transition returns
/// [`BridgeError::TaskAlreadyTerminal`] and is logged.
pub struct TaskUpdater {
    task_id: String,
    context_id: String,
    queue: Arc<TaskEventQueue>,
    state: Mutex<Option<TaskState>>,
}

impl TaskUpdater {
    /// Updater for a task the protocol layer has not seen yet.
    pub fn new(
        task_id: impl Into<String>,
        context_id: impl Into<String>,
        queue: Arc<TaskEventQueue>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            queue,
            state: Mutex::new(None),
        }
    }

    /// Updater continuing an already known task.
    pub fn for_task(task: &Task, queue: Arc<TaskEventQueue>) -> Self {
        Self {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            queue,
            state: Mutex::new(Some(task.status.state)),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub async fn state(&self) -> Option<TaskState> {
        *self.state.lock().await
    }

    /// Closes the task as `canceled`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::TaskAlreadyTerminal`] if the task already ended.
    pub async fn cancel(&self) -> BridgeResult<()> {
        self.transition(TaskState::Canceled, None, None).await
    }

    /// Moves the task to `to` and publishes the matching status update,
    /// preceded by the response artifact when one is given.
    async fn transition(
        &self,
        to: TaskState,
        parts: Option<Vec<Part>>,
        artifact: Option<Vec<Part>>,
    ) -> BridgeResult<()> {
        let mut state = self.state.lock().await;
        if let Some(current) = *state {
            if current.is_terminal() {
                tracing::error!(
                    task.id = %self.task_id,
                    state = ?current,
                    attempted = ?to,
                    "task already reached a terminal state"
                );
                return Err(BridgeError::TaskAlreadyTerminal {
                    task_id: self.task_id.clone(),
                    state: format!("{current:?}"),
                });
            }
        }
        if !can_transition(*state, to) {
            return Err(BridgeError::InvalidTaskStateTransition {
                from: state.map_or_else(|| "absent".to_string(), |s| format!("{s:?}")),
                to: format!("{to:?}"),
            });
        }

        if let Some(artifact_parts) = artifact {
            let artifact = create_artifact_update_event(
                &self.task_id,
                &self.context_id,
                response_artifact(artifact_parts),
            );
            self.queue.publish(TaskEvent::ArtifactUpdate(artifact));
        }
        let message = parts.map(|parts| agent_message(&self.task_id, &self.context_id, parts));
        let update = create_status_update_event(
            &self.task_id,
            &self.context_id,
            status(to, message),
            to.is_terminal(),
        );
        *state = Some(to);
        self.queue.publish(TaskEvent::StatusUpdate(update));
        Ok(())
    }
}

#[async_trait]
impl TaskSink for TaskUpdater {
    async fn has_existing_task(&self) -> bool {
        self.state.lock().await.is_some()
    }

    async fn submit(&self) -> BridgeResult<()> {
        self.transition(TaskState::Submitted, None, None).await
    }

    async fn start_work(&self) -> BridgeResult<()> {
        self.transition(TaskState::Working, None, None).await
    }

    async fn post_status_update(&self, parts: Vec<Part>) -> BridgeResult<()> {
        self.transition(TaskState::Working, Some(parts), None).await
    }

    async fn post_artifact_and_complete(&self, parts: Vec<Part>) -> BridgeResult<()> {
        self.transition(TaskState::Completed, None, Some(parts)).await
    }

    async fn fail(&self, message: &str) -> BridgeResult<()> {
        self.transition(TaskState::Failed, Some(vec![Part::text(message)]), None)
            .await
    }
}
