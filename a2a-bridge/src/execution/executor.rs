//! Entry point for inbound A2A requests.

use crate::config::BridgeSettings;
use crate::execution::lifecycle::{LifecycleOutcome, TaskLifecycle};
use crate::errors::{BridgeError, BridgeResult};
use crate::models::codec;
use crate::runtime::AgentRuntime;
use crate::sessions::SessionResolver;
use crate::task::{TaskEventQueue, TaskProjection, TaskSink, TaskUpdater};
use a2a_types::{Message, MessageSendParams, Task, TaskIdParams};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One request as the executor sees it.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub task_id: String,
    /// Identifies the runtime session; the A2A `contextId`.
    pub session_id: String,
    /// Prior messages, oldest first. The last one is the active turn.
    pub messages: Vec<Message>,
}

/// A `message/send` call resolved against the task it continues, if any.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub task_id: String,
    pub context_id: String,
    pub message: Message,
    pub current_task: Option<Task>,
}

impl RequestContext {
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] when the message names a task
    /// other than `current_task`, or when `current_task` already ended.
    pub fn new(params: MessageSendParams, current_task: Option<Task>) -> BridgeResult<Self> {
        let message = params.message;
        let (task_id, context_id) = match &current_task {
            Some(task) => {
                if let Some(requested) = message.task_id.as_deref() {
                    if requested != task.id {
                        return Err(BridgeError::InvalidInput(format!(
                            "message targets task {requested} but task {} is current",
                            task.id
                        )));
                    }
                }
                if task.status.state.is_terminal() {
                    return Err(BridgeError::InvalidInput(format!(
                        "task {} is already {:?}",
                        task.id, task.status.state
                    )));
                }
                (task.id.clone(), task.context_id.clone())
            }
            None => (
                message.task_id.clone().unwrap_or_else(new_id),
                message.context_id.clone().unwrap_or_else(new_id),
            ),
        };
        Ok(Self {
            task_id,
            context_id,
            message,
            current_task,
        })
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn cancelled(stage: &str) -> LifecycleOutcome {
    tracing::info!(stage, "task cancelled before the runtime stream was consumed");
    LifecycleOutcome::Cancelled
}

/// Entry in the running-task registry. Dropping it, when the run ends or its
/// future is abandoned, unregisters the task and evicts its event log.
struct RunningGuard<'a> {
    running: &'a DashMap<String, CancellationToken>,
    queue: &'a TaskEventQueue,
    task_id: &'a str,
}

impl<'a> RunningGuard<'a> {
    fn register(
        running: &'a DashMap<String, CancellationToken>,
        queue: &'a TaskEventQueue,
        task_id: &'a str,
        token: CancellationToken,
    ) -> BridgeResult<Self> {
        match running.entry(task_id.to_string()) {
            Entry::Occupied(_) => Err(BridgeError::InvalidInput(format!(
                "task {task_id} is already running"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(token);
                Ok(Self {
                    running,
                    queue,
                    task_id,
                })
            }
        }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.queue.remove(self.task_id);
        self.running.remove(self.task_id);
    }
}

/// Runs A2A requests against an agent runtime.
///
/// Owns the session resolver and the task event queue, and tracks a
/// cancellation token per running task so `tasks/cancel` can stop it.
pub struct BridgeExecutor {
    runtime: Arc<dyn AgentRuntime>,
    resolver: SessionResolver,
    queue: Arc<TaskEventQueue>,
    running: DashMap<String, CancellationToken>,
}

impl BridgeExecutor {
    pub fn new(runtime: Arc<dyn AgentRuntime>, user_id: impl Into<String>) -> Self {
        let resolver = SessionResolver::new(runtime.session_service(), runtime.app_name(), user_id);
        Self {
            runtime,
            resolver,
            queue: Arc::new(TaskEventQueue::new()),
            running: DashMap::new(),
        }
    }

    pub fn from_settings(runtime: Arc<dyn AgentRuntime>, settings: &BridgeSettings) -> Self {
        Self::new(runtime, settings.user_id.clone())
    }

    pub fn queue(&self) -> Arc<TaskEventQueue> {
        self.queue.clone()
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Executes one request, driving `sink` through the task lifecycle.
    ///
    /// Returns `Ok(None)` without touching the sink when there are no
    /// messages. Session and runtime failures fail the task and return
    /// `Ok(Some(LifecycleOutcome::Failed))`. `cancel` is honored while the
    /// session resolves, while the runtime starts and while its events are
    /// awaited; once it fires the sink is not called again.
    ///
    /// # Errors
    ///
    /// Propagates sink errors.
    #[tracing::instrument(
        name = "bridge.executor.execute",
        skip(self, request, sink, cancel),
        fields(task.id = %request.task_id, session.id = %request.session_id)
    )]
    pub async fn execute(
        &self,
        request: &ExecutionRequest,
        sink: &dyn TaskSink,
        cancel: CancellationToken,
    ) -> BridgeResult<Option<LifecycleOutcome>> {
        let Some(message) = request.messages.last() else {
            tracing::debug!("no messages in request, nothing to execute");
            return Ok(None);
        };

        let lifecycle = TaskLifecycle::new(sink, &request.task_id);
        lifecycle.begin().await?;

        let resolved = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(Some(cancelled("session resolution"))),
            resolved = self.resolver.resolve(&request.session_id) => resolved,
        };
        let session = match resolved {
            Ok(session) => session,
            Err(err) => return lifecycle.fail_with(&err).await.map(Some),
        };

        let content = codec::message_to_content(message);
        tracing::debug!(parts = content.len(), "starting runtime turn");
        let started = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(Some(cancelled("runtime start"))),
            started = self.runtime.run(&session, content) => started,
        };
        let stream = match started {
            Ok(stream) => stream,
            Err(err) => return lifecycle.fail_with(&err).await.map(Some),
        };

        lifecycle.drive(stream, &cancel).await.map(Some)
    }

    /// Handles `message/send`: runs the message to completion against a
    /// [`TaskUpdater`] and returns the resulting task.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidInput`] for requests that cannot be
    /// matched to a task or whose task is already being executed, and
    /// propagates lifecycle errors.
    pub async fn handle_message(
        &self,
        params: MessageSendParams,
        current_task: Option<Task>,
    ) -> BridgeResult<Task> {
        let context = RequestContext::new(params, current_task)?;
        let RequestContext {
            task_id,
            context_id,
            message,
            current_task,
        } = context;

        let cancel = CancellationToken::new();
        let _running =
            RunningGuard::register(&self.running, &self.queue, &task_id, cancel.clone())?;

        let updater = match &current_task {
            Some(task) => TaskUpdater::for_task(task, self.queue.clone()),
            None => TaskUpdater::new(&task_id, &context_id, self.queue.clone()),
        };
        let request = ExecutionRequest {
            task_id: task_id.clone(),
            session_id: context_id.clone(),
            messages: vec![message.clone()],
        };
        let result = self.execute(&request, &updater, cancel).await;
        let closed = match result {
            Ok(Some(LifecycleOutcome::Cancelled)) => updater.cancel().await,
            Ok(_) => Ok(()),
            Err(err) => Err(err),
        };
        let events = self.queue.remove(&task_id);
        closed?;

        let projection = match current_task {
            Some(task) => TaskProjection::from_task(task),
            None => TaskProjection::new(&task_id, &context_id),
        };
        Ok(projection
            .with_history(message)
            .apply_all(&events)
            .into_task())
    }

    /// Handles `tasks/cancel` by firing the running task's cancellation token.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::TaskNotRunning`] when no execution is in flight
    /// for the task.
    pub fn cancel(&self, params: &TaskIdParams) -> BridgeResult<()> {
        let Some(token) = self.running.get(&params.id).map(|entry| entry.value().clone()) else {
            return Err(BridgeError::TaskNotRunning {
                task_id: params.id.clone(),
            });
        };
        tracing::info!(task.id = %params.id, "cancelling task");
        token.cancel();
        Ok(())
    }

    /// Whether an execution is in flight for `task_id`.
    pub fn is_running(&self, task_id: &str) -> bool {
        self.running.contains_key(task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2a_types::{MessageRole, Part, TaskState, TaskStatus};

    fn params(message: Message) -> MessageSendParams {
        MessageSendParams {
            message,
            metadata: None,
        }
    }

    fn task(id: &str, state: TaskState) -> Task {
        Task {
            kind: a2a_types::TASK_KIND.to_string(),
            id: id.to_string(),
            context_id: "ctx".to_string(),
            status: TaskStatus::new(state),
            history: Vec::new(),
            artifacts: Vec::new(),
            metadata: None,
        }
    }

    #[test]
    fn new_request_takes_ids_from_message() {
        let message = Message::new("m1", MessageRole::User, vec![Part::text("hi")])
            .with_task("task-1", "ctx-1");
        let context = RequestContext::new(params(message), None).expect("context");
        assert_eq!(context.task_id, "task-1");
        assert_eq!(context.context_id, "ctx-1");
    }

    #[test]
    fn missing_ids_are_generated() {
        let message = Message::new("m1", MessageRole::User, vec![Part::text("hi")]);
        let context = RequestContext::new(params(message), None).expect("context");
        assert!(!context.task_id.is_empty());
        assert!(!context.context_id.is_empty());
        assert_ne!(context.task_id, context.context_id);
    }

    #[test]
    fn mismatched_task_is_rejected() {
        let message =
            Message::new("m1", MessageRole::User, Vec::new()).with_task("other", "ctx");
        let err = RequestContext::new(params(message), Some(task("task-1", TaskState::Working)))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidInput(_)));
    }

    #[test]
    fn terminal_task_cannot_continue() {
        let message = Message::new("m1", MessageRole::User, Vec::new());
        let err = RequestContext::new(params(message), Some(task("task-1", TaskState::Completed)))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidInput(_)));
    }

    #[test]
    fn current_task_supplies_ids() {
        let message = Message::new("m1", MessageRole::User, Vec::new());
        let context = RequestContext::new(params(message), Some(task("task-1", TaskState::InputRequired)))
            .expect("context");
        assert_eq!(context.task_id, "task-1");
        assert_eq!(context.context_id, "ctx");
    }
}
