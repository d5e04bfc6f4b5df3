use crate::errors::BridgeResult;
use crate::models::Content;
use async_trait::async_trait;

use super::session::Session;

/// Session persistence owned by the agent runtime.
///
/// Sessions are scoped by application name and user id. The bridge only
/// reads and creates; appending history is the runtime's business.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Option<Session>>;

    /// Creates a session with the given identifier.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Session>;

    /// Appends a turn to the session's history.
    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        content: Content,
    ) -> BridgeResult<()>;

    async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<()>;

    async fn list_sessions(&self, app_name: &str, user_id: &str) -> BridgeResult<Vec<Session>>;
}
