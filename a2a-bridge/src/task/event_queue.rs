//! Per-task fan-out and log of task events.
//!
//! Subscribers (for example a streaming response) receive each event as it is
//! published. The queue also keeps the ordered log of a running task so it
//! can be projected into an A2A [`a2a_types::Task`]. The log lives until the
//! task is removed, which the executor does once the run has ended.

use a2a_types::{TaskArtifactUpdateEvent, TaskStatusUpdateEvent};
use dashmap::DashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// An update published for a task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    StatusUpdate(TaskStatusUpdateEvent),
    ArtifactUpdate(TaskArtifactUpdateEvent),
}

impl TaskEvent {
    pub fn task_id(&self) -> &str {
        match self {
            TaskEvent::StatusUpdate(update) => &update.task_id,
            TaskEvent::ArtifactUpdate(update) => &update.task_id,
        }
    }

    /// True for the status update that closes the task.
    pub fn is_final(&self) -> bool {
        matches!(self, TaskEvent::StatusUpdate(update) if update.is_final)
    }
}

pub type TaskEventReceiver = UnboundedReceiver<TaskEvent>;

#[derive(Default)]
struct TaskChannel {
    senders: Vec<UnboundedSender<TaskEvent>>,
    log: Vec<TaskEvent>,
}

impl TaskChannel {
    fn broadcast(&mut self, event: &TaskEvent) {
        self.senders
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}

/// Multiplexes [`TaskEvent`]s to subscribers per task.
#[derive(Default)]
pub struct TaskEventQueue {
    inner: DashMap<String, TaskChannel>,
}

impl TaskEventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events published for `task_id` from now on.
    #[must_use]
    pub fn subscribe(&self, task_id: &str) -> TaskEventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .entry(task_id.to_string())
            .or_default()
            .senders
            .push(tx);
        rx
    }

    /// Records the event and delivers it to live subscribers.
    pub fn publish(&self, event: TaskEvent) {
        let mut channel = self.inner.entry(event.task_id().to_string()).or_default();
        channel.broadcast(&event);
        channel.log.push(event);
    }

    /// Events published so far for `task_id`, oldest first.
    #[must_use]
    pub fn history(&self, task_id: &str) -> Vec<TaskEvent> {
        self.inner
            .get(task_id)
            .map(|channel| channel.log.clone())
            .unwrap_or_default()
    }

    /// Forgets the task's log and subscribers, returning the log.
    ///
    /// Subscribers see their stream end once the events already sent to
    /// them are drained.
    pub fn remove(&self, task_id: &str) -> Vec<TaskEvent> {
        self.inner
            .remove(task_id)
            .map(|(_, channel)| channel.log)
            .unwrap_or_default()
    }

    /// Number of tasks with a live log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
