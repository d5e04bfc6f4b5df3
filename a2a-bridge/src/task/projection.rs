//! Folds a task's event log into an A2A [`Task`] snapshot.

use a2a_types::{Message, Task, TaskState, TaskStatus};

use super::event_queue::TaskEvent;

/// Builds the current view of a task from the events published for it.
///
/// Status updates replace the status (and their agent message is appended to
/// the history) and artifact updates append artifacts. Events for other
/// tasks are ignored.
#[derive(Debug, Clone)]
pub struct TaskProjection {
    task: Task,
}

impl TaskProjection {
    /// Starts from a task in the `submitted` state.
    pub fn new(task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            task: Task {
                kind: a2a_types::TASK_KIND.to_string(),
                id: task_id.into(),
                context_id: context_id.into(),
                status: TaskStatus::new(TaskState::Submitted),
                history: Vec::new(),
                artifacts: Vec::new(),
                metadata: None,
            },
        }
    }

    /// Continues from a known task.
    pub fn from_task(task: Task) -> Self {
        Self { task }
    }

    /// Seeds the history with the inbound user message.
    #[must_use]
    pub fn with_history(mut self, message: Message) -> Self {
        self.task.history.push(message);
        self
    }

    pub fn apply(&mut self, event: &TaskEvent) {
        if event.task_id() != self.task.id {
            return;
        }
        match event {
            TaskEvent::StatusUpdate(update) => {
                if let Some(message) = &update.status.message {
                    self.task.history.push(message.clone());
                }
                self.task.status = update.status.clone();
            }
            TaskEvent::ArtifactUpdate(update) => {
                self.task.artifacts.push(update.artifact.clone());
            }
        }
    }

    pub fn apply_all<'a>(mut self, events: impl IntoIterator<Item = &'a TaskEvent>) -> Self {
        for event in events {
            self.apply(event);
        }
        self
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn into_task(self) -> Task {
        self.task
    }
}
