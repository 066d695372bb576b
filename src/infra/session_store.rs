//! Server-side session records.
//!
//! The signed token a client holds only names a session; the record here
//! is what makes it live. Deleting the record revokes the session even
//! while the token is still within its expiry.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use super::cache::Cache;
use crate::config::{Config, SessionBackend};
use crate::domain::SessionIdentity;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a session until its `expires_at`.
    async fn save(&self, session: &SessionIdentity) -> AppResult<()>;

    /// Live session by id. Expired records are reported as absent.
    async fn find(&self, session_id: &str) -> AppResult<Option<SessionIdentity>>;

    /// Drop a session. Unknown ids are not an error.
    async fn revoke(&self, session_id: &str) -> AppResult<()>;

    /// Backend reachability, for the health check
    async fn ping(&self) -> AppResult<()>;
}

/// Build the store selected by `SESSION_BACKEND`.
pub async fn connect_session_store(config: &Config) -> AppResult<Arc<dyn SessionStore>> {
    match config.session_backend {
        SessionBackend::Redis => {
            let cache = Cache::connect(config).await?;
            Ok(Arc::new(RedisSessionStore::new(cache)))
        }
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory session store; sessions will not survive restarts");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}

/// Sessions kept in Redis with a TTL matching their expiry.
pub struct RedisSessionStore {
    cache: Cache,
}

impl RedisSessionStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session: &SessionIdentity) -> AppResult<()> {
        let ttl = (session.expires_at - Utc::now()).num_seconds().max(1) as u64;
        self.cache
            .set_session(&session.session_id, session, ttl)
            .await
    }

    async fn find(&self, session_id: &str) -> AppResult<Option<SessionIdentity>> {
        let session: Option<SessionIdentity> = self.cache.get_session(session_id).await?;
        Ok(session.filter(|s| !s.is_expired(Utc::now())))
    }

    async fn revoke(&self, session_id: &str) -> AppResult<()> {
        self.cache.delete_session(session_id).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.cache.ping().await
    }
}

/// Process-local sessions for single-node deployments and tests.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionIdentity>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &SessionIdentity) -> AppResult<()> {
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn find(&self, session_id: &str) -> AppResult<Option<SessionIdentity>> {
        let now = Utc::now();
        let expired = match self.sessions.get(session_id) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sessions.remove(session_id);
        }
        Ok(None)
    }

    async fn revoke(&self, session_id: &str) -> AppResult<()> {
        self.sessions.remove(session_id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use chrono::Duration;
    use uuid::Uuid;

    fn session(id: &str, lifetime: Duration) -> SessionIdentity {
        let now = Utc::now();
        SessionIdentity {
            session_id: id.to_string(),
            user_id: Uuid::new_v4(),
            role: UserRole::Student,
            display_name: "Ana Cruz".to_string(),
            issued_at: now,
            expires_at: now + lifetime,
        }
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip_and_revoke() {
        let store = MemorySessionStore::new();
        let s = session("s1", Duration::days(30));

        store.save(&s).await.unwrap();
        assert_eq!(store.find("s1").await.unwrap(), Some(s));

        store.revoke("s1").await.unwrap();
        assert!(store.find("s1").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_drops_expired_sessions() {
        let store = MemorySessionStore::new();
        store.save(&session("old", Duration::seconds(-1))).await.unwrap();

        assert!(store.find("old").await.unwrap().is_none());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_revoking_unknown_session_is_ok() {
        let store = MemorySessionStore::new();
        assert!(store.revoke("missing").await.is_ok());
    }
}
