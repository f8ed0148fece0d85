use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side record binding a session key to an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Session store - abstraction over session backends (Redis, in-memory).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a live session.
    async fn get(&self, key: &str) -> Result<Option<Session>, SessionError>;

    /// Store a session, expiring after `ttl`.
    async fn set(&self, key: &str, session: &Session, ttl: Duration) -> Result<(), SessionError>;

    /// Remove a session. Removing an unknown key is not an error.
    async fn destroy(&self, key: &str) -> Result<(), SessionError>;
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
