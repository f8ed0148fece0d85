//! In-memory session store - used when Redis is not configured.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{Session, SessionError, SessionStore};

struct Entry {
    session: Session,
    expires_at: Instant,
}

/// Sessions held in a `HashMap` behind an async `RwLock`.
///
/// Sessions are lost on process restart and are not shared between instances.
pub struct InMemorySessionStore {
    store: RwLock<HashMap<String, Entry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<Session>, SessionError> {
        let store = self.store.read().await;
        let Some(entry) = store.get(key) else {
            return Ok(None);
        };

        if Instant::now() >= entry.expires_at {
            drop(store);
            // Expired: clean up with the write lock
            self.store.write().await.remove(key);
            return Ok(None);
        }

        Ok(Some(entry.session.clone()))
    }

    async fn set(&self, key: &str, session: &Session, ttl: Duration) -> Result<(), SessionError> {
        let now = Instant::now();
        let mut store = self.store.write().await;
        // Abandoned sessions are never looked up again
        store.retain(|_, entry| entry.expires_at > now);
        store.insert(
            key.to_string(),
            Entry {
                session: session.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn destroy(&self, key: &str) -> Result<(), SessionError> {
        self.store.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn set_get_destroy() {
        let store = InMemorySessionStore::new();
        let session = Session::new(Uuid::new_v4());

        store
            .set("k1", &session, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k1").await.unwrap(), Some(session));

        store.destroy("k1").await.unwrap();
        assert_eq!(store.get("k1").await.unwrap(), None);
        // destroying twice is fine
        store.destroy("k1").await.unwrap();
    }

    #[tokio::test]
    async fn expired_session_is_gone() {
        let store = InMemorySessionStore::new();
        store
            .set("k1", &Session::new(Uuid::new_v4()), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(store.get("k1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_sweeps_abandoned_sessions() {
        let store = InMemorySessionStore::new();
        for key in ["gone-1", "gone-2"] {
            store
                .set(key, &Session::new(Uuid::new_v4()), Duration::ZERO)
                .await
                .unwrap();
        }
        store
            .set("live", &Session::new(Uuid::new_v4()), Duration::from_secs(60))
            .await
            .unwrap();

        let keys: Vec<String> = store.store.read().await.keys().cloned().collect();
        assert_eq!(keys, vec!["live".to_string()]);
    }
}
