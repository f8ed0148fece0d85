//! In-memory media host - used when Cloudinary is not configured.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{HostedMedia, MediaError, MediaHost};

/// Records uploads and serves them back from the local upload route.
#[derive(Default)]
pub struct InMemoryMediaHost {
    hosted: RwLock<HashSet<String>>,
    failing: AtomicBool,
}

impl InMemoryMediaHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later upload fail, to exercise rollback paths.
    pub fn fail_uploads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn contains(&self, public_id: &str) -> bool {
        self.hosted.read().await.contains(public_id)
    }

    pub async fn is_empty(&self) -> bool {
        self.hosted.read().await.is_empty()
    }
}

#[async_trait]
impl MediaHost for InMemoryMediaHost {
    async fn upload(&self, path: &Path) -> Result<HostedMedia, MediaError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MediaError::Upload("media host unavailable".to_string()));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MediaError::Upload(format!("no file name in {}", path.display())))?;

        let public_id = format!("local/{file_name}");
        self.hosted.write().await.insert(public_id.clone());

        Ok(HostedMedia {
            url: format!("/uploads/{file_name}"),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        self.hosted.write().await.remove(public_id);
        Ok(())
    }
}
