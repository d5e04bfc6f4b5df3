use crate::errors::{BridgeError, BridgeResult};
use crate::models::Content;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::session::Session;
use super::session_service::SessionService;

type UserSessions = Arc<DashMap<String, Session>>;

/// In-memory [`SessionService`] for development and tests.
///
/// Sessions are stored as `app -> user -> session_id -> Session`, so one
/// user can never read another user's session by id.
pub struct InMemorySessionService {
    sessions: Arc<DashMap<String, Arc<DashMap<String, UserSessions>>>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        tracing::warn!(
            "InMemorySessionService created; sessions are kept in process memory and never evicted"
        );
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    fn user_sessions(&self, app_name: &str, user_id: &str) -> UserSessions {
        let app_users = self
            .sessions
            .entry(app_name.to_string())
            .or_insert_with(|| Arc::new(DashMap::new()))
            .value()
            .clone();
        let user_sessions = app_users
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(DashMap::new()))
            .value()
            .clone();
        user_sessions
    }

    fn existing_user_sessions(&self, app_name: &str, user_id: &str) -> Option<UserSessions> {
        let app_users = self.sessions.get(app_name)?.value().clone();
        let user_sessions = app_users.get(user_id)?.value().clone();
        Some(user_sessions)
    }

    pub fn clear(&self) {
        self.sessions.clear();
    }
}

impl Default for InMemorySessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Option<Session>> {
        Ok(self
            .existing_user_sessions(app_name, user_id)
            .and_then(|sessions| sessions.get(session_id).map(|entry| entry.value().clone())))
    }

    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<Session> {
        let sessions = self.user_sessions(app_name, user_id);
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id, app_name, user_id));
        Ok(entry.value().clone())
    }

    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        content: Content,
    ) -> BridgeResult<()> {
        let sessions = self
            .existing_user_sessions(app_name, user_id)
            .ok_or_else(|| missing_session(session_id))?;
        let mut session = sessions
            .get_mut(session_id)
            .ok_or_else(|| missing_session(session_id))?;
        session.append_event(content);
        Ok(())
    }

    async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> BridgeResult<()> {
        if let Some(sessions) = self.existing_user_sessions(app_name, user_id) {
            sessions.remove(session_id);
        }
        Ok(())
    }

    async fn list_sessions(&self, app_name: &str, user_id: &str) -> BridgeResult<Vec<Session>> {
        Ok(self
            .existing_user_sessions(app_name, user_id)
            .map(|sessions| sessions.iter().map(|entry| entry.value().clone()).collect())
            .unwrap_or_default())
    }
}

fn missing_session(session_id: &str) -> BridgeError {
    BridgeError::SessionStore {
        session_id: session_id.to_string(),
        reason: "session does not exist".to_string(),
    }
}
