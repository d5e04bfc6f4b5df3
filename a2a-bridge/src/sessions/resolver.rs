//! Get-or-create resolution of runtime sessions.

use crate::errors::{BridgeError, BridgeResult};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::session::Session;
use super::session_service::SessionService;

/// Resolves a session identifier to a runtime session, creating it on first use.
///
/// Resolution of one identifier is serialized through a keyed async mutex,
/// so two concurrent requests for a fresh identifier produce a single
/// session. Different identifiers never contend.
pub struct SessionResolver {
    service: Arc<dyn SessionService>,
    app_name: String,
    user_id: String,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionResolver {
    pub fn new(
        service: Arc<dyn SessionService>,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            service,
            app_name: app_name.into(),
            user_id: user_id.into(),
            locks: DashMap::new(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the session for `session_id`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::SessionCreationFailed`] when the lookup or the
    /// creation fails, or when the service hands back a different session.
    #[tracing::instrument(name = "bridge.session.resolve", skip(self), fields(app = %self.app_name))]
    pub async fn resolve(&self, session_id: &str) -> BridgeResult<Session> {
        let lease = LockLease::acquire(&self.locks, session_id);
        let _guard = lease.lock().lock().await;
        self.get_or_create(session_id).await
    }

    async fn get_or_create(&self, session_id: &str) -> BridgeResult<Session> {
        let existing = self
            .service
            .get_session(&self.app_name, &self.user_id, session_id)
            .await
            .map_err(|err| creation_failed(session_id, &err))?;
        if let Some(session) = existing {
            tracing::debug!(session.id = %session_id, "reusing existing session");
            return Ok(session);
        }

        let session = self
            .service
            .create_session(&self.app_name, &self.user_id, session_id)
            .await
            .map_err(|err| creation_failed(session_id, &err))?;
        if session.id != session_id {
            return Err(BridgeError::SessionCreationFailed {
                session_id: session_id.to_string(),
                reason: format!("session service returned session {}", session.id),
            });
        }
        tracing::info!(session.id = %session_id, "created session");
        Ok(session)
    }

    /// Number of identifiers with an outstanding lock entry.
    pub fn pending_locks(&self) -> usize {
        self.locks.len()
    }
}

/// A session's lock entry, held for one resolution.
///
/// Dropping the lease removes the entry once no other resolver holds or
/// awaits it, including when the resolving future is dropped midway.
struct LockLease<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    session_id: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> LockLease<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, session_id: &'a str) -> Self {
        let lock = locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        Self {
            locks,
            session_id,
            lock,
        }
    }

    fn lock(&self) -> &Mutex<()> {
        &self.lock
    }
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        // Two handles left: the map's and this lease's.
        self.locks
            .remove_if(self.session_id, |_, lock| Arc::strong_count(lock) == 2);
    }
}

fn creation_failed(session_id: &str, err: &BridgeError) -> BridgeError {
    BridgeError::SessionCreationFailed {
        session_id: session_id.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::InMemorySessionService;

    fn resolver() -> SessionResolver {
        SessionResolver::new(Arc::new(InMemorySessionService::new()), "app", "user")
    }

    #[tokio::test]
    async fn resolving_twice_returns_same_session() {
        let resolver = resolver();
        let first = resolver.resolve("s1").await.expect("first");
        let second = resolver.resolve("s1").await.expect("second");

        assert_eq!(first.id, "s1");
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(resolver.pending_locks(), 0);
    }

    #[tokio::test]
    async fn different_ids_get_different_sessions() {
        let resolver = resolver();
        let a = resolver.resolve("a").await.expect("a");
        let b = resolver.resolve("b").await.expect("b");
        assert_ne!(a.id, b.id);
        assert_eq!(resolver.app_name(), "app");
        assert_eq!(resolver.user_id(), "user");
    }

    #[tokio::test]
    async fn abandoned_resolution_releases_its_lock() {
        let service = Arc::new(crate::test_support::CountingSessionService::new(
            std::time::Duration::from_secs(60),
        ));
        let resolver = SessionResolver::new(service, "app", "user");

        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            resolver.resolve("slow"),
        )
        .await;

        assert!(abandoned.is_err());
        assert_eq!(resolver.pending_locks(), 0);
    }
}
