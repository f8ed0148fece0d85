//! Local upload directory on the filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use quill_core::ports::{FileStore, StorageError, StoredFile};

/// Stores uploads as flat files under one directory.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory if needed.
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self::new(root);
        tokio::fs::create_dir_all(&store.root).await?;
        tracing::info!(root = %store.root.display(), "Upload directory ready");
        Ok(store)
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError> {
        let name = validate_flat_filename(filename)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        ensure_image(original_name)?;
        let filename = generate_filename(original_name);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(filename = %filename, size = bytes.len(), "Upload written");

        Ok(StoredFile { filename, path })
    }

    async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve(filename)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, filename: &str) -> Result<(), StorageError> {
        let path = self.resolve(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `{millis}-{random}.{ext}`, keeping a sanitized extension from the client name.
fn generate_filename(original_name: &str) -> String {
    let stem = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..12]
    );

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Uploads are served back from our own origin, so only raster images get in.
/// SVG is refused since it can carry script.
fn ensure_image(original_name: &str) -> Result<(), StorageError> {
    let mime = mime_guess::from_path(original_name).first();
    match mime {
        Some(m) if m.type_() == mime_guess::mime::IMAGE && m.subtype() != mime_guess::mime::SVG => {
            Ok(())
        }
        _ => Err(StorageError::NotAnImage(original_name.to_string())),
    }
}

/// Reject anything but a plain file name inside the upload directory.
pub fn validate_flat_filename(filename: &str) -> Result<&str, StorageError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(StorageError::InvalidFilename("filename cannot be empty"));
    }
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidFilename(
            "control characters are not allowed",
        ));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(StorageError::InvalidFilename(
            "path separators are not allowed",
        ));
    }
    if trimmed.starts_with('.') {
        return Err(StorageError::InvalidFilename(
            "hidden files and '..' are not allowed",
        ));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let stored = store.save("Holiday.JPG", b"jpeg-bytes").await.unwrap();
        assert!(stored.filename.ends_with(".jpg"));
        assert!(stored.path.starts_with(dir.path()));

        let bytes = store.read(&stored.filename).await.unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"jpeg-bytes"[..]));

        store.delete(&stored.filename).await.unwrap();
        assert_eq!(store.read(&stored.filename).await.unwrap(), None);
        // idempotent
        store.delete(&stored.filename).await.unwrap();
    }

    #[tokio::test]
    async fn only_raster_images_are_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        for name in ["evil.html", "page.htm", "logo.svg", "script.js", "noext"] {
            assert!(
                matches!(store.save(name, b"<script>").await, Err(StorageError::NotAnImage(_))),
                "{name} should be refused"
            );
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        for name in ["a.png", "b.JPEG", "c.gif", "d.webp"] {
            assert!(store.save(name, b"img").await.is_ok(), "{name} should be stored");
        }
    }

    #[test]
    fn generated_names_are_unique_and_drop_odd_extensions() {
        let a = generate_filename("cover.png");
        let b = generate_filename("cover.png");
        assert_ne!(a, b);
        assert!(!generate_filename("evil.p/h p").contains('/'));
        assert!(!generate_filename("noext").contains('.'));
    }

    #[test]
    fn traversal_is_rejected() {
        assert!(validate_flat_filename("../etc/passwd").is_err());
        assert!(validate_flat_filename("..").is_err());
        assert!(validate_flat_filename("a\\b").is_err());
        assert!(validate_flat_filename(".env").is_err());
        assert_eq!(validate_flat_filename(" 1-a.png ").unwrap(), "1-a.png");
    }
}
