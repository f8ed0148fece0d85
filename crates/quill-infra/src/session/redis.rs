//! Redis session store with automatic reconnection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use quill_core::ports::{Session, SessionError, SessionStore};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Prefix applied to every session key.
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "quill:sess:".to_string(),
        }
    }
}

impl RedisConfig {
    /// Build from a URL, reading the remaining knobs from the environment.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            key_prefix: std::env::var("REDIS_SESSION_PREFIX")
                .unwrap_or_else(|_| "quill:sess:".to_string()),
        }
    }
}

/// Redis-backed session store. Sessions are stored as JSON with `SETEX`.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    config: RedisConfig,
}

impl RedisSessionStore {
    pub async fn new(config: RedisConfig) -> Result<Self, SessionError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| SessionError::Connection(e.to_string()))?;
        // Host and port only, the URL may carry a password
        let addr = client.get_connection_info().addr.to_string();

        // Use timeout to prevent hanging if Redis is unreachable
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| SessionError::Connection("Connection timed out".to_string()))?
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        tracing::info!(%addr, "Connected to Redis session store");

        Ok(Self { conn, config })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<Session>, SessionError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(self.key(key))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))?;

        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| SessionError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, key: &str, session: &Session, ttl: Duration) -> Result<(), SessionError> {
        let json =
            serde_json::to_string(session).map_err(|e| SessionError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(self.key(key), json, ttl.as_secs().max(1))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))
    }

    async fn destroy(&self, key: &str) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(key))
            .await
            .map_err(|e| SessionError::Operation(e.to_string()))
    }
}
