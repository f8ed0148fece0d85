//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! repositories, session stores, media hosts, and local file storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `redis` - Redis session store
//! - `cloudinary` - Cloudinary media host

pub mod auth;
pub mod database;
pub mod media;
pub mod session;
pub mod storage;

// Re-exports - always available
pub use auth::{Argon2PasswordHasher, JwtSessionSigner, SessionTokenConfig};
pub use database::{InMemoryPostRepository, InMemoryUserRepository};
pub use media::InMemoryMediaHost;
pub use session::InMemorySessionStore;
pub use storage::LocalFileStore;

// Re-exports - external services
#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresPostRepository, PostgresUserRepository,
};
#[cfg(feature = "cloudinary")]
pub use media::{CloudinaryConfig, CloudinaryMediaHost};
#[cfg(feature = "redis")]
pub use session::{RedisConfig, RedisSessionStore};
