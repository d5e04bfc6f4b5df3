//! Drives a task sink through the A2A lifecycle from a runtime event stream.

use crate::execution::classifier::{classify, Classified};
use crate::execution::error_mapper::to_failure_message;
use crate::errors::{BridgeError, BridgeResult};
use crate::models::codec;
use crate::runtime::EventStream;
use crate::task::TaskSink;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

/// How a driven task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Completed,
    Failed,
    /// The cancellation token fired; no terminal transition was issued.
    Cancelled,
}

/// Task lifecycle controller for one request.
///
/// `begin` submits (when the task is new) and starts work. `drive` then
/// consumes the runtime's events in order until the final one, issuing
/// exactly one terminal transition unless cancelled.
pub struct TaskLifecycle<'a> {
    sink: &'a dyn TaskSink,
    task_id: &'a str,
}

impl<'a> TaskLifecycle<'a> {
    pub fn new(sink: &'a dyn TaskSink, task_id: &'a str) -> Self {
        Self { sink, task_id }
    }

    /// `absent → submitted → working`, or just `→ working` for a known task.
    ///
    /// # Errors
    ///
    /// Propagates sink errors.
    pub async fn begin(&self) -> BridgeResult<()> {
        if !self.sink.has_existing_task().await {
            self.sink.submit().await?;
        }
        self.sink.start_work().await?;
        tracing::info!(task.id = %self.task_id, "task started");
        Ok(())
    }

    /// Consumes `stream` until the final event, the end of the stream, a
    /// runtime error, or cancellation.
    ///
    /// Events after the first final one are never polled.
    ///
    /// # Errors
    ///
    /// Propagates sink errors. Runtime errors are not returned; they fail the task.
    #[tracing::instrument(name = "bridge.task.drive", skip_all, fields(task.id = %self.task_id))]
    pub async fn drive(
        &self,
        mut stream: EventStream,
        cancel: &CancellationToken,
    ) -> BridgeResult<LifecycleOutcome> {
        let mut forwarded = 0usize;
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!(forwarded, "task cancelled, abandoning runtime stream");
                    return Ok(LifecycleOutcome::Cancelled);
                }
                next = stream.next() => next,
            };

            let event = match next {
                None => {
                    tracing::warn!(forwarded, "runtime stream ended without a final response");
                    return self.fail_with(&BridgeError::IncompleteResponse).await;
                }
                Some(Err(err)) => return self.fail_with(&err).await,
                Some(Ok(event)) => event,
            };

            let event_id = event.id.clone();
            match classify(event) {
                Classified::ToolCall => {
                    tracing::debug!(event.id = %event_id, "suppressing tool call event");
                }
                Classified::Intermediate(parts) => {
                    let parts = codec::to_protocol(parts);
                    if parts.is_empty() {
                        tracing::debug!(event.id = %event_id, "skipping empty intermediate event");
                        continue;
                    }
                    self.sink.post_status_update(parts).await?;
                    forwarded += 1;
                }
                Classified::Final(parts) => {
                    self.sink
                        .post_artifact_and_complete(codec::to_protocol(parts))
                        .await?;
                    tracing::info!(forwarded, "task completed");
                    return Ok(LifecycleOutcome::Completed);
                }
            }
        }
    }

    /// Fails the task with the client-facing message for `error`.
    ///
    /// # Errors
    ///
    /// Propagates sink errors.
    pub async fn fail_with(&self, error: &BridgeError) -> BridgeResult<LifecycleOutcome> {
        tracing::error!(task.id = %self.task_id, error = %error, "task failed");
        self.sink.fail(&to_failure_message(error)).await?;
        Ok(LifecycleOutcome::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentPart, ExecutionEvent, FunctionCall};
    use crate::test_support::{RecordingSink, SinkCall};
    use a2a_types::Part;
    use futures::stream;
    use serde_json::json;

    fn stream_of(items: Vec<BridgeResult<ExecutionEvent>>) -> EventStream {
        stream::iter(items).boxed()
    }

    #[tokio::test]
    async fn begin_submits_new_task() {
        let sink = RecordingSink::new();
        TaskLifecycle::new(&sink, "t1").begin().await.expect("begin");
        assert_eq!(sink.calls(), vec![SinkCall::Submit, SinkCall::StartWork]);
    }

    #[tokio::test]
    async fn begin_skips_submit_for_existing_task() {
        let sink = RecordingSink::with_existing_task();
        TaskLifecycle::new(&sink, "t1").begin().await.expect("begin");
        assert_eq!(sink.calls(), vec![SinkCall::StartWork]);
    }

    #[tokio::test]
    async fn tool_calls_then_final_completes_without_updates() {
        let sink = RecordingSink::new();
        let stream = stream_of(vec![
            Ok(ExecutionEvent::tool_calls("agent", vec![FunctionCall::new("a", json!({}))])),
            Ok(ExecutionEvent::tool_calls("agent", vec![FunctionCall::new("b", json!({}))])),
            Ok(ExecutionEvent::final_response("agent", vec![ContentPart::from_text("done")])),
        ]);

        let outcome = TaskLifecycle::new(&sink, "t1")
            .drive(stream, &CancellationToken::new())
            .await
            .expect("drive");

        assert_eq!(outcome, LifecycleOutcome::Completed);
        assert_eq!(
            sink.calls(),
            vec![SinkCall::Complete(vec![Part::text("done")])]
        );
    }

    #[tokio::test]
    async fn exhausted_stream_fails_once() {
        let sink = RecordingSink::new();
        let stream = stream_of(vec![Ok(ExecutionEvent::intermediate(
            "agent",
            vec![ContentPart::from_text("partial")],
        ))]);

        let outcome = TaskLifecycle::new(&sink, "t1")
            .drive(stream, &CancellationToken::new())
            .await
            .expect("drive");

        assert_eq!(outcome, LifecycleOutcome::Failed);
        assert_eq!(sink.terminal_count(), 1);
        assert!(matches!(sink.calls().last(), Some(SinkCall::Fail(_))));
    }

    #[tokio::test]
    async fn runtime_error_fails_with_translated_message() {
        let sink = RecordingSink::new();
        let stream = stream_of(vec![Err(BridgeError::runtime("socket reset by 10.1.2.3"))]);

        TaskLifecycle::new(&sink, "t1")
            .drive(stream, &CancellationToken::new())
            .await
            .expect("drive");

        let Some(SinkCall::Fail(message)) = sink.calls().pop() else {
            panic!("expected fail call");
        };
        assert!(!message.contains("10.1.2.3"));
    }

    #[tokio::test]
    async fn empty_intermediate_emits_nothing() {
        let sink = RecordingSink::new();
        let stream = stream_of(vec![
            Ok(ExecutionEvent::new("agent", None, false)),
            Ok(ExecutionEvent::intermediate("agent", vec![ContentPart::from_text("")])),
            Ok(ExecutionEvent::final_response("agent", vec![ContentPart::from_text("ok")])),
        ]);

        TaskLifecycle::new(&sink, "t1")
            .drive(stream, &CancellationToken::new())
            .await
            .expect("drive");

        assert_eq!(sink.calls(), vec![SinkCall::Complete(vec![Part::text("ok")])]);
    }

    #[tokio::test]
    async fn events_after_final_are_not_forwarded() {
        let sink = RecordingSink::new();
        let stream = stream_of(vec![
            Ok(ExecutionEvent::final_response("agent", vec![ContentPart::from_text("answer")])),
            Ok(ExecutionEvent::intermediate("agent", vec![ContentPart::from_text("late")])),
        ]);

        TaskLifecycle::new(&sink, "t1")
            .drive(stream, &CancellationToken::new())
            .await
            .expect("drive");

        assert_eq!(sink.calls(), vec![SinkCall::Complete(vec![Part::text("answer")])]);
    }

    #[tokio::test]
    async fn cancelled_token_stops_without_terminal_call() {
        let sink = RecordingSink::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let stream: EventStream = stream::pending().boxed();

        let outcome = TaskLifecycle::new(&sink, "t1")
            .drive(stream, &cancel)
            .await
            .expect("drive");

        assert_eq!(outcome, LifecycleOutcome::Cancelled);
        assert!(sink.calls().is_empty());
    }
}
