//! Shared fakes for bridge tests.
//!
//! Available when running tests or with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use a2a_types::Part;
use async_trait::async_trait;

use crate::errors::{BridgeError, BridgeResult};
use crate::models::{Content, ExecutionEvent};
use crate::runtime::{AgentRuntime, EventStream};
use crate::sessions::{InMemorySessionService, Session, SessionService};
use crate::task::TaskSink;

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Submit,
    StartWork,
    StatusUpdate(Vec<Part>),
    Complete(Vec<Part>),
    Fail(String),
}

impl SinkCall {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SinkCall::Complete(_) | SinkCall::Fail(_))
    }
}

/// A [`TaskSink`] that records every call and never rejects one.
#[derive(Clone, Default)]
pub struct RecordingSink {
    existing_task: bool,
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink for a request whose task the protocol layer already knows.
    #[must_use]
    pub fn with_existing_task() -> Self {
        Self {
            existing_task: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls
            .lock()
            .expect("recording sink mutex poisoned")
            .clone()
    }

    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.calls().iter().filter(|call| call.is_terminal()).count()
    }

    fn record(&self, call: SinkCall) {
        self.calls
            .lock()
            .expect("recording sink mutex poisoned")
            .push(call);
    }
}

#[async_trait]
impl TaskSink for RecordingSink {
    async fn has_existing_task(&self) -> bool {
        self.existing_task
    }

    async fn submit(&self) -> BridgeResult<()> {
        self.record(SinkCall::Submit);
        Ok(())
    }

    async fn start_work(&self) -> BridgeResult<()> {
        self.record(SinkCall::StartWork);
        Ok(())
    }

    async fn post_status_update(&self, parts: Vec<Part>) -> BridgeResult<()> {
        self.record(SinkCall::StatusUpdate(parts));
        Ok(())
    }

    async fn post_artifact_and_complete(&self, parts: Vec<Part>) -> BridgeResult<()> {
        self.record(SinkCall::Complete(parts));
        Ok(())
    }

    async fn fail(&self, message: &str) -> BridgeResult<()> {
        self.record(SinkCall::Fail(message.to_string()));
        Ok(())
    }
}

/// What a [`ScriptedRuntime`] does for one `run` call.
pub enum Script {
    /// Yield these items, then end the stream.
    Events(Vec<BridgeResult<ExecutionEvent>>),
    /// Yield these items, then never yield again.
    Hang(Vec<BridgeResult<ExecutionEvent>>),
    /// Refuse to start the turn.
    StartError(BridgeError),
    /// Never finish starting the turn.
    Stall,
}

/// An [`AgentRuntime`] that replays queued scripts.
///
/// Each `run` dequeues the next script; running out of scripts is a start
/// error. Inbound content is appended to the session like a real runtime
/// would, and every run is recorded for inspection.
#[derive(Clone)]
pub struct ScriptedRuntime {
    app_name: String,
    sessions: Arc<dyn SessionService>,
    scripts: Arc<Mutex<VecDeque<Script>>>,
    runs: Arc<Mutex<Vec<(String, Content)>>>,
    stream_dropped: Arc<AtomicBool>,
}

impl ScriptedRuntime {
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self::with_session_service(app_name, Arc::new(InMemorySessionService::new()))
    }

    #[must_use]
    pub fn with_session_service(
        app_name: impl Into<String>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            sessions,
            scripts: Arc::new(Mutex::new(VecDeque::new())),
            runs: Arc::new(Mutex::new(Vec::new())),
            stream_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn push_script(&self, script: Script) {
        self.scripts
            .lock()
            .expect("scripted runtime mutex poisoned")
            .push_back(script);
    }

    /// Convenience for a script of successful events.
    pub fn push_events(&self, events: Vec<ExecutionEvent>) {
        self.push_script(Script::Events(events.into_iter().map(Ok).collect()));
    }

    /// `(session id, content)` of every run so far.
    #[must_use]
    pub fn runs(&self) -> Vec<(String, Content)> {
        self.runs
            .lock()
            .expect("scripted runtime mutex poisoned")
            .clone()
    }

    /// Whether the last handed-out stream has been dropped.
    #[must_use]
    pub fn stream_dropped(&self) -> bool {
        self.stream_dropped.load(Ordering::SeqCst)
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn session_service(&self) -> Arc<dyn SessionService> {
        self.sessions.clone()
    }

    async fn run(&self, session: &Session, content: Content) -> BridgeResult<EventStream> {
        self.runs
            .lock()
            .expect("scripted runtime mutex poisoned")
            .push((session.id.clone(), content.clone()));
        self.sessions
            .append_event(&session.app_name, &session.user_id, &session.id, content)
            .await?;

        let script = self
            .scripts
            .lock()
            .expect("scripted runtime mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Script::StartError(BridgeError::runtime("no script queued")));

        let (items, hang) = match script {
            Script::Events(items) => (items, false),
            Script::Hang(items) => (items, true),
            Script::StartError(err) => return Err(err),
            Script::Stall => return futures::future::pending().await,
        };

        self.stream_dropped.store(false, Ordering::SeqCst);
        let flag = DropFlag(self.stream_dropped.clone());
        let stream = async_stream::stream! {
            let _flag = flag;
            for item in items {
                yield item;
            }
            if hang {
                futures::future::pending::<()>().await;
            }
        };
        Ok(Box::pin(stream))
    }
}

/// A [`SessionService`] wrapper that counts creations and slows lookups,
/// widening the window for racing resolvers.
pub struct CountingSessionService {
    inner: InMemorySessionService,
    creations: AtomicUsize,
    lookup_delay: Duration,
}

impl CountingSessionService {
    #[must_use]
    pub fn new(lookup_delay: Duration) -> Self {
        Self {
            inner: InMemorySessionService::new(),
            creations: AtomicUsize::new(0),
            lookup_delay,
        }
    }

    #[must_use]
    pub fn creations(&self) -> usize {
        self.creations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionService for CountingSessionService {
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Option<Session>> {
        let found = self.inner.get_session(app_name, user_id, session_id).await?;
        tokio::time::sleep(self.lookup_delay).await;
        Ok(found)
    }

    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Session> {
        self.creations.fetch_add(1, Ordering::SeqCst);
        self.inner.create_session(app_name, user_id, session_id).await
    }

    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        content: Content,
    ) -> BridgeResult<()> {
        self.inner
            .append_event(app_name, user_id, session_id, content)
            .await
    }

    async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<()> {
        self.inner.delete_session(app_name, user_id, session_id).await
    }

    async fn list_sessions(&self, app_name: &str, user_id: &str) -> BridgeResult<Vec<Session>> {
        self.inner.list_sessions(app_name, user_id).await
    }
}

/// A [`SessionService`] whose every call fails.
pub struct FailingSessionService;

#[async_trait]
impl SessionService for FailingSessionService {
    async fn get_session(
        &self,
        _app_name: &str,
        _user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Option<Session>> {
        Err(unavailable(session_id))
    }

    async fn create_session(
        &self,
        _app_name: &str,
        _user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Session> {
        Err(unavailable(session_id))
    }

    async fn append_event(
        &self,
        _app_name: &str,
        _user_id: &str,
        session_id: &str,
        _content: Content,
    ) -> BridgeResult<()> {
        Err(unavailable(session_id))
    }

    async fn delete_session(
        &self,
        _app_name: &str,
        _user_id: &str,
        session_id: &str,
    ) -> BridgeResult<()> {
        Err(unavailable(session_id))
    }

    async fn list_sessions(&self, _app_name: &str, _user_id: &str) -> BridgeResult<Vec<Session>> {
        Ok(Vec::new())
    }
}

fn unavailable(session_id: &str) -> BridgeError {
    BridgeError::SessionStore {
        session_id: session_id.to_string(),
        reason: "session backend unavailable".to_string(),
    }
}
