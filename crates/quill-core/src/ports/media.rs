//! Media attachment ports: the external image host and the local upload directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// What the media host hands back for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedMedia {
    pub url: String,
    pub public_id: String,
}

/// External media host (Cloudinary or an in-memory stand-in).
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload a local file and return its durable URL and deletion handle.
    async fn upload(&self, path: &Path) -> Result<HostedMedia, MediaError>;

    /// Delete a hosted file. Deleting an unknown handle succeeds.
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Media host rejected request: {0}")]
    Rejected(String),
}

/// A file written to the local upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated flat filename.
    pub filename: String,
    /// Absolute or working-directory-relative path on disk.
    pub path: PathBuf,
}

/// Local upload directory.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist an image under a freshly generated filename keeping the original extension.
    ///
    /// Anything whose name does not mark it as a raster image is refused.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError>;

    /// Read a stored file, `None` if it does not exist.
    async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Delete a stored file. Deleting a missing file succeeds.
    async fn delete(&self, filename: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(&'static str),

    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
