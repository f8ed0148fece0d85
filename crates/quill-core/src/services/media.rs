//! Cover and avatar attachments across the local upload directory and the media host.

use std::sync::Arc;

use crate::domain::MediaRef;
use crate::error::DomainError;
use crate::ports::{FileStore, MediaHost, StorageError};

/// A file received from the client, not yet persisted anywhere.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Keeps the local copy and the hosted copy of an image in step.
///
/// The two deletions are independent and never coupled to the document
/// write that follows them; a failed deletion is logged and the copies may
/// drift from what the document records.
pub struct Attachments {
    host: Arc<dyn MediaHost>,
    files: Arc<dyn FileStore>,
}

impl Attachments {
    pub fn new(host: Arc<dyn MediaHost>, files: Arc<dyn FileStore>) -> Self {
        Self { host, files }
    }

    /// Store the upload locally, then mirror it to the media host.
    ///
    /// If the host rejects it, the local copy is removed again.
    pub async fn attach(&self, upload: Upload) -> Result<MediaRef, DomainError> {
        let stored = self
            .files
            .save(&upload.filename, &upload.bytes)
            .await
            .map_err(|e| match e {
                StorageError::Io(e) => DomainError::Internal(e.to_string()),
                other => DomainError::Validation(other.to_string()),
            })?;

        match self.host.upload(&stored.path).await {
            Ok(hosted) => {
                tracing::debug!(
                    filename = %stored.filename,
                    public_id = %hosted.public_id,
                    "Attachment stored"
                );
                Ok(MediaRef {
                    local_file: Some(stored.filename),
                    url: Some(hosted.url),
                    public_id: Some(hosted.public_id),
                })
            }
            Err(e) => {
                tracing::warn!(filename = %stored.filename, error = %e, "Media upload failed");
                if let Err(e) = self.files.delete(&stored.filename).await {
                    tracing::warn!(filename = %stored.filename, error = %e, "Local cleanup failed");
                }
                Err(DomainError::UpstreamMedia(e.to_string()))
            }
        }
    }

    /// Best-effort removal of both copies. Never fails.
    pub async fn discard(&self, media: &MediaRef) {
        if let Some(public_id) = &media.public_id {
            match self.host.destroy(public_id).await {
                Ok(()) => tracing::debug!(public_id = %public_id, "Hosted media deleted"),
                Err(e) => {
                    tracing::warn!(public_id = %public_id, error = %e, "Hosted media delete failed")
                }
            }
        }

        if let Some(filename) = &media.local_file {
            if let Err(e) = self.files.delete(filename).await {
                tracing::warn!(filename = %filename, error = %e, "Local media delete failed");
            }
        }
    }
}
