//! The agent runtime the bridge drives.
//!
//! A runtime owns sessions and executes one turn of content against a
//! session, yielding [`ExecutionEvent`]s as it goes. Tool execution happens
//! inside the runtime and is only visible as function-call parts.

use crate::errors::BridgeResult;
use crate::models::{Content, ExecutionEvent};
use crate::sessions::{Session, SessionService};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Events produced by one runtime turn. Dropping the stream abandons the turn.
pub type EventStream = BoxStream<'static, BridgeResult<ExecutionEvent>>;

#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Application name sessions are scoped under.
    fn app_name(&self) -> &str;

    fn session_service(&self) -> Arc<dyn SessionService>;

    /// Starts processing `content` against `session`.
    ///
    /// Errors returned here mean the turn never started. Errors yielded by
    /// the stream mean it broke midway.
    async fn run(&self, session: &Session, content: Content) -> BridgeResult<EventStream>;
}
