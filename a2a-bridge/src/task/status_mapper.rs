//! Builders for the A2A status, message, and artifact objects a task emits.
//!
//! Every protocol object the task updater publishes is constructed here, so
//! the updater itself only deals with state transitions.

use a2a_types::{
    Artifact, Message, MessageRole, Part, TaskArtifactUpdateEvent, TaskState, TaskStatus,
    TaskStatusUpdateEvent,
};

/// Name given to the artifact that carries the agent's final answer.
pub const RESPONSE_ARTIFACT_NAME: &str = "response";

/// A status stamped with the current time.
#[must_use]
pub fn status(state: TaskState, message: Option<Message>) -> TaskStatus {
    TaskStatus {
        state,
        timestamp: Some(now()),
        message,
    }
}

#[must_use]
pub fn working_status() -> TaskStatus {
    status(TaskState::Working, None)
}

/// An agent-authored message bound to the given task.
#[must_use]
pub fn agent_message(task_id: &str, context_id: &str, parts: Vec<Part>) -> Message {
    Message::new(uuid::Uuid::new_v4().to_string(), MessageRole::Agent, parts)
        .with_task(task_id, context_id)
}

#[must_use]
pub fn response_artifact(parts: Vec<Part>) -> Artifact {
    Artifact {
        artifact_id: uuid::Uuid::new_v4().to_string(),
        parts,
        name: Some(RESPONSE_ARTIFACT_NAME.to_string()),
        description: None,
        metadata: None,
    }
}

#[must_use]
pub fn create_status_update_event(
    task_id: &str,
    context_id: &str,
    status: TaskStatus,
    is_final: bool,
) -> TaskStatusUpdateEvent {
    TaskStatusUpdateEvent {
        kind: a2a_types::STATUS_UPDATE_KIND.to_string(),
        task_id: task_id.to_string(),
        context_id: context_id.to_string(),
        status,
        is_final,
        metadata: None,
    }
}

#[must_use]
pub fn create_artifact_update_event(
    task_id: &str,
    context_id: &str,
    artifact: Artifact,
) -> TaskArtifactUpdateEvent {
    TaskArtifactUpdateEvent {
        kind: a2a_types::ARTIFACT_UPDATE_KIND.to_string(),
        task_id: task_id.to_string(),
        context_id: context_id.to_string(),
        artifact,
        append: None,
        last_chunk: Some(true),
        metadata: None,
    }
}

/// Whether the lifecycle allows moving from `from` to `to`.
///
/// `None` stands for a task the protocol layer has not seen yet.
#[must_use]
pub fn can_transition(from: Option<TaskState>, to: TaskState) -> bool {
    match (from, to) {
        (Some(current), _) if current.is_terminal() => false,
        (None, TaskState::Submitted) => true,
        (Some(_), TaskState::Submitted) => false,
        (_, TaskState::Working) => true,
        (Some(TaskState::Working), TaskState::Completed) => true,
        (_, TaskState::Failed | TaskState::Canceled) => true,
        _ => false,
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_status_is_stamped() {
        let status = working_status();
        assert_eq!(status.state, TaskState::Working);
        assert!(status.timestamp.is_some());
        assert!(status.message.is_none());
    }

    #[test]
    fn agent_message_is_bound_to_task() {
        let message = agent_message("task-1", "ctx-1", vec![Part::text("thinking")]);
        assert_eq!(message.role, MessageRole::Agent);
        assert_eq!(message.task_id.as_deref(), Some("task-1"));
        assert_eq!(message.context_id.as_deref(), Some("ctx-1"));
    }

    #[test]
    fn transitions_follow_lifecycle() {
        assert!(can_transition(None, TaskState::Submitted));
        assert!(can_transition(Some(TaskState::Submitted), TaskState::Working));
        assert!(can_transition(Some(TaskState::Working), TaskState::Working));
        assert!(can_transition(Some(TaskState::Working), TaskState::Completed));
        assert!(can_transition(Some(TaskState::Submitted), TaskState::Failed));

        assert!(!can_transition(Some(TaskState::Submitted), TaskState::Completed));
        assert!(!can_transition(Some(TaskState::Working), TaskState::Submitted));
        assert!(!can_transition(Some(TaskState::Completed), TaskState::Failed));
        assert!(!can_transition(Some(TaskState::Failed), TaskState::Working));
    }

    #[test]
    fn artifact_update_marks_last_chunk() {
        let event =
            create_artifact_update_event("task-1", "ctx-1", response_artifact(vec![Part::text("x")]));
        assert_eq!(event.kind, "artifact-update");
        assert_eq!(event.last_chunk, Some(true));
        assert_eq!(event.artifact.name.as_deref(), Some(RESPONSE_ARTIFACT_NAME));
    }
}
