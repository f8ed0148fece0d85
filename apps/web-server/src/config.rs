//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

#[cfg(feature = "cloudinary")]
use quill_infra::CloudinaryConfig;
#[cfg(feature = "postgres")]
use quill_infra::DatabaseConfig;
use quill_infra::SessionTokenConfig;

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "quill.sid".to_string(),
            secure: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub redis_url: Option<String>,
    #[cfg(feature = "cloudinary")]
    pub cloudinary: Option<CloudinaryConfig>,
    pub session: SessionTokenConfig,
    pub cookie: CookieConfig,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            redis_url: env::var("REDIS_URL").ok().filter(|u| !u.is_empty()),
            #[cfg(feature = "cloudinary")]
            cloudinary: CloudinaryConfig::from_env(),
            session: SessionTokenConfig::from_env(),
            cookie: CookieConfig {
                name: env::var("SESSION_COOKIE").unwrap_or_else(|_| "quill.sid".to_string()),
                secure: env::var("COOKIE_SECURE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            },
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/uploads")),
            upload_max_bytes: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
        }
    }
}
