//! # A2A (Agent2Agent) Protocol Types
//!
//! Serde data model for the part of the A2A protocol a task-executing agent
//! touches: messages and their parts, tasks and their status, artifacts, the
//! streaming update events, the request parameters for `message/send` and
//! `tasks/cancel`, and the agent card.
//!
//! Field names follow the protocol's camelCase JSON schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod agent_card;
pub use agent_card::{AgentCapabilities, AgentCard, AgentSkill};

/// Free-form extension metadata attached to most protocol objects.
pub type Metadata = HashMap<String, serde_json::Value>;

// ============================================================================
// Constants
// ============================================================================

pub const PROTOCOL_VERSION: &str = "0.3.0";

pub const TASK_KIND: &str = "task";
pub const MESSAGE_KIND: &str = "message";
pub const STATUS_UPDATE_KIND: &str = "status-update";
pub const ARTIFACT_UPDATE_KIND: &str = "artifact-update";

/// MIME type assumed for file parts that do not declare one.
pub const DEFAULT_FILE_MIME_TYPE: &str = "application/octet-stream";

// ============================================================================
// Tasks
// ============================================================================

/// Lifecycle states of a Task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Rejected,
    AuthRequired,
    Unknown,
}

impl TaskState {
    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed | TaskState::Rejected
        )
    }
}

/// Status of a task at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,
    /// RFC 3339 timestamp of when this status was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Optional agent message explaining the status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            timestamp: None,
            message: None,
        }
    }
}

/// A stateful unit of work between a client and an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(default = "default_task_kind")]
    pub kind: String,
    pub id: String,
    #[serde(rename = "contextId")]
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub history: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub artifacts: Vec<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

fn default_task_kind() -> String {
    TASK_KIND.to_string()
}

// ============================================================================
// Messages and parts
// ============================================================================

/// Identifies the sender of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

/// A single turn of communication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    #[serde(default = "default_message_kind")]
    pub kind: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub role: MessageRole,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "contextId")]
    pub context_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "taskId")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

fn default_message_kind() -> String {
    MESSAGE_KIND.to_string()
}

impl Message {
    /// Builds a message with the given role and parts and no task binding.
    pub fn new(message_id: impl Into<String>, role: MessageRole, parts: Vec<Part>) -> Self {
        Self {
            kind: default_message_kind(),
            message_id: message_id.into(),
            role,
            parts,
            context_id: None,
            task_id: None,
            metadata: None,
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self.context_id = Some(context_id.into());
        self
    }
}

/// A content part of a message or artifact.
///
/// Parts are discriminated by `kind`. Any kind this crate does not know
/// deserializes into [`Part::Unknown`] instead of failing the whole message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    File {
        file: FileContent,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    Data {
        data: serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    #[serde(other)]
    Unknown,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    pub fn data(data: serde_json::Value) -> Self {
        Part::Data {
            data,
            metadata: None,
        }
    }

    pub fn file(file: impl Into<FileContent>) -> Self {
        Part::File {
            file: file.into(),
            metadata: None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// File content, inline as base64 or by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FileContent {
    WithBytes(FileWithBytes),
    WithUri(FileWithUri),
}

impl From<FileWithBytes> for FileContent {
    fn from(value: FileWithBytes) -> Self {
        FileContent::WithBytes(value)
    }
}

impl From<FileWithUri> for FileContent {
    fn from(value: FileWithUri) -> Self {
        FileContent::WithUri(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileWithBytes {
    /// Base64-encoded file content.
    pub bytes: String,
    #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileWithUri {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Output produced by an agent for a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    #[serde(rename = "artifactId")]
    pub artifact_id: String,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

// ============================================================================
// Method parameters
// ============================================================================

/// Parameters of `message/send` and `message/stream`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Parameters of task-addressed methods such as `tasks/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskIdParams {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

// ============================================================================
// Streaming events
// ============================================================================

/// Notifies the client of a change in a task's status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatusUpdateEvent {
    #[serde(default = "default_status_update_kind")]
    pub kind: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "contextId")]
    pub context_id: String,
    pub status: TaskStatus,
    /// Set on the last event of the interaction.
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

fn default_status_update_kind() -> String {
    STATUS_UPDATE_KIND.to_string()
}

/// Notifies the client that an artifact was produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskArtifactUpdateEvent {
    #[serde(default = "default_artifact_update_kind")]
    pub kind: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "contextId")]
    pub context_id: String,
    pub artifact: Artifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "lastChunk")]
    pub last_chunk: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

fn default_artifact_update_kind() -> String {
    ARTIFACT_UPDATE_KIND.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_part_kind_deserializes_to_unknown() {
        let parts: Vec<Part> = serde_json::from_value(json!([
            {"kind": "text", "text": "hi"},
            {"kind": "hologram", "frames": 3}
        ]))
        .expect("parts");

        assert_eq!(parts, vec![Part::text("hi"), Part::Unknown]);
    }

    #[test]
    fn file_part_uses_protocol_field_names() {
        let part = Part::file(FileWithUri {
            uri: "gs://bucket/report.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
            name: None,
        });

        let value = serde_json::to_value(&part).expect("serialize");
        assert_eq!(value["kind"], "file");
        assert_eq!(value["file"]["uri"], "gs://bucket/report.pdf");
        assert_eq!(value["file"]["mimeType"], "application/pdf");
    }

    #[test]
    fn status_update_serializes_final_flag() {
        let event = TaskStatusUpdateEvent {
            kind: STATUS_UPDATE_KIND.to_string(),
            task_id: "t1".to_string(),
            context_id: "c1".to_string(),
            status: TaskStatus::new(TaskState::Completed),
            is_final: true,
            metadata: None,
        };

        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["final"], true);
        assert_eq!(value["status"]["state"], "completed");
        assert_eq!(value["taskId"], "t1");
    }

    #[test]
    fn terminal_states() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::Submitted.is_terminal());
    }
}
