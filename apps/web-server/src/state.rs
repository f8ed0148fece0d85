//! Application state - shared across all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use quill_core::ports::{
    FileStore, MediaHost, PasswordService, PostRepository, SessionSigner, SessionStore,
    UserRepository,
};
use quill_core::services::{Attachments, AuthService, FeedService, PostService, ProfileService};
use quill_infra::{
    Argon2PasswordHasher, InMemoryMediaHost, InMemoryPostRepository, InMemorySessionStore,
    InMemoryUserRepository, JwtSessionSigner, LocalFileStore, SessionTokenConfig,
};

#[cfg(feature = "cloudinary")]
use quill_infra::CloudinaryMediaHost;
#[cfg(feature = "postgres")]
use quill_infra::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "redis")]
use quill_infra::{RedisConfig, RedisSessionStore};

use crate::config::{AppConfig, CookieConfig};
use crate::views::{ShellRenderer, ViewRenderer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub feeds: Arc<FeedService>,
    pub profiles: Arc<ProfileService>,
    pub files: Arc<dyn FileStore>,
    pub renderer: Arc<dyn ViewRenderer>,
    pub cookie: CookieConfig,
    pub upload_max_bytes: usize,
}

/// The adapters behind the services.
struct Adapters {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    sessions: Arc<dyn SessionStore>,
    media: Arc<dyn MediaHost>,
    files: Arc<dyn FileStore>,
}

impl AppState {
    /// Build the application state, falling back to in-memory adapters for
    /// every external service that is not configured or not reachable.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let (users, posts) = Self::repositories(config).await;
        let sessions = Self::session_store(config).await;
        let media = Self::media_host(config);
        let files: Arc<dyn FileStore> = Arc::new(
            LocalFileStore::init(config.upload_dir.clone())
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?,
        );

        let adapters = Adapters {
            users,
            posts,
            sessions,
            media,
            files,
        };

        tracing::info!("Application state initialized");
        Ok(Self::assemble(
            adapters,
            config.session.clone(),
            config.cookie.clone(),
            config.upload_max_bytes,
        ))
    }

    /// Fully in-memory state over a local upload directory.
    pub fn in_memory(upload_dir: impl Into<PathBuf>) -> Self {
        let adapters = Adapters {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            media: Arc::new(InMemoryMediaHost::new()),
            files: Arc::new(LocalFileStore::new(upload_dir)),
        };

        Self::assemble(
            adapters,
            SessionTokenConfig::default(),
            CookieConfig::default(),
            5 * 1024 * 1024,
        )
    }

    fn assemble(
        adapters: Adapters,
        session: SessionTokenConfig,
        cookie: CookieConfig,
        upload_max_bytes: usize,
    ) -> Self {
        let Adapters {
            users,
            posts,
            sessions,
            media,
            files,
        } = adapters;

        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordHasher::new());
        let signer: Arc<dyn SessionSigner> = Arc::new(JwtSessionSigner::new(session));
        let attachments = Arc::new(Attachments::new(media, files.clone()));

        Self {
            auth: Arc::new(AuthService::new(
                users.clone(),
                passwords,
                signer,
                sessions,
            )),
            posts: Arc::new(PostService::new(
                posts.clone(),
                users.clone(),
                attachments.clone(),
            )),
            feeds: Arc::new(FeedService::new(posts, users.clone())),
            profiles: Arc::new(ProfileService::new(users, attachments)),
            files,
            renderer: Arc::new(ShellRenderer),
            cookie,
            upload_max_bytes,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(
        config: &AppConfig,
    ) -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::memory_repositories();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => (
                Arc::new(PostgresUserRepository::new(connections.main.clone())),
                Arc::new(PostgresPostRepository::new(connections.main)),
            ),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::memory_repositories()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(
        _config: &AppConfig,
    ) -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::memory_repositories()
    }

    fn memory_repositories() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        (
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }

    async fn session_store(config: &AppConfig) -> Arc<dyn SessionStore> {
        let Some(url) = &config.redis_url else {
            tracing::warn!("REDIS_URL not set. Sessions are kept in memory.");
            return Arc::new(InMemorySessionStore::new());
        };

        #[cfg(feature = "redis")]
        match RedisSessionStore::new(RedisConfig::from_url(url.clone())).await {
            Ok(store) => return Arc::new(store),
            Err(e) => {
                tracing::error!("Failed to connect to Redis: {}. Sessions are kept in memory.", e)
            }
        }

        #[cfg(not(feature = "redis"))]
        {
            let _ = url;
            tracing::warn!("REDIS_URL set but the redis feature is disabled");
        }

        Arc::new(InMemorySessionStore::new())
    }

    #[cfg(feature = "cloudinary")]
    fn media_host(config: &AppConfig) -> Arc<dyn MediaHost> {
        let Some(cloudinary) = &config.cloudinary else {
            tracing::warn!("Cloudinary not configured. Uploads are served from the local directory.");
            return Arc::new(InMemoryMediaHost::new());
        };

        Arc::new(CloudinaryMediaHost::new(cloudinary.clone()))
    }

    #[cfg(not(feature = "cloudinary"))]
    fn media_host(_config: &AppConfig) -> Arc<dyn MediaHost> {
        tracing::info!("Running without cloudinary feature - uploads are served locally");
        Arc::new(InMemoryMediaHost::new())
    }
}
