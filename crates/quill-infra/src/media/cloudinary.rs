//! Cloudinary media host.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use cloudinary::upload::{OptionalParameters, Source, Upload, UploadResult};

use quill_core::ports::{HostedMedia, MediaError, MediaHost};

/// Cloudinary credentials.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    /// Only used to sign requests. Should never be shared!
    pub api_secret: String,
    pub folder: String,
}

impl CloudinaryConfig {
    /// Returns `None` unless the cloud name, key and secret are all set.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            cloud_name: var("CLOUDINARY_CLOUD_NAME")?,
            api_key: var("CLOUDINARY_API_KEY")?,
            api_secret: var("CLOUDINARY_API_SECRET")?,
            folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| "quill".to_string()),
        })
    }
}

pub struct CloudinaryMediaHost {
    upload: Upload,
    folder: String,
}

impl CloudinaryMediaHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        tracing::info!(cloud = %config.cloud_name, folder = %config.folder, "Cloudinary media host configured");
        Self {
            upload: Upload::new(config.api_key, config.cloud_name, config.api_secret),
            folder: config.folder,
        }
    }
}

/// Turn an upload answer into the url and handle quill keeps.
fn hosted(result: UploadResult) -> Result<HostedMedia, MediaError> {
    match result {
        UploadResult::Response(r) => Ok(HostedMedia {
            url: r.secure_url,
            public_id: r.public_id,
        }),
        UploadResult::ResponseWithImageMetadata(r) => Ok(HostedMedia {
            url: r.secure_url,
            public_id: r.public_id,
        }),
        UploadResult::Error(e) => Err(MediaError::Rejected(e.error.message)),
    }
}

/// `"not found"` counts as deleted.
fn destroyed(public_id: &str, result: &str) -> Result<(), MediaError> {
    match result {
        "ok" | "not found" => Ok(()),
        other => Err(MediaError::Delete(format!(
            "unexpected result {other:?} for {public_id}"
        ))),
    }
}

#[async_trait]
impl MediaHost for CloudinaryMediaHost {
    async fn upload(&self, path: &Path) -> Result<HostedMedia, MediaError> {
        let options = BTreeSet::from([OptionalParameters::Folder(self.folder.clone())]);

        let result = self
            .upload
            .image(Source::Path(path.to_path_buf()), &options)
            .await
            .map_err(|e| MediaError::Upload(format!("{e:#}")))?;

        let media = hosted(result)?;
        tracing::debug!(public_id = %media.public_id, "Uploaded to Cloudinary");
        Ok(media)
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let result = self
            .upload
            .destroy(public_id.to_string())
            .await
            .map_err(|e| MediaError::Delete(format!("{e:#}")))?;

        destroyed(public_id, &result.result)
    }
}
