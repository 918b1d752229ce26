//! Image store writing uploads into a local directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;

use glow_core::domain::{ImageUpload, StoredImage, UploadPolicy, stored_file_name};
use glow_core::error::UploadError;
use glow_core::ports::ImageStore;

/// Stores images as `<dir>/<timestamp>-<sanitized name>` and reports them
/// under `<public_prefix>/<file name>`.
pub struct DiskImageStore {
    dir: PathBuf,
    public_prefix: String,
    policy: UploadPolicy,
}

impl DiskImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>, policy: UploadPolicy) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into(),
            policy,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<StoredImage, UploadError> {
        self.policy.check(&upload)?;

        let file_name = stored_file_name(Utc::now().timestamp_millis(), &upload.file_name);
        self.ensure_dir().await?;
        fs::write(self.dir.join(&file_name), &upload.bytes)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;

        tracing::debug!(
            file = %file_name,
            bytes = upload.bytes.len(),
            content_type = %upload.content_type,
            "Image stored"
        );

        let public_path = format!("{}/{}", self.public_prefix.trim_end_matches('/'), file_name);
        Ok(StoredImage {
            file_name,
            public_path,
        })
    }

    async fn remove(&self, image: &StoredImage) -> Result<(), UploadError> {
        match fs::remove_file(self.dir.join(&image.file_name)).await {
            Ok(()) => {
                tracing::debug!(file = %image.file_name, "Image removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn upload(content_type: &str, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: "holiday pic.png".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![7; len],
        }
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_public_path() {
        let temp = TempDir::new().unwrap();
        let store = DiskImageStore::new(temp.path().join("uploads"), "/uploads", UploadPolicy::default());

        let stored = store.store(upload("image/png", 16)).await.unwrap();

        assert!(stored.file_name.ends_with("-holiday-pic.png"));
        assert_eq!(stored.public_path, format!("/uploads/{}", stored.file_name));
        let written = std::fs::read(store.dir().join(&stored.file_name)).unwrap();
        assert_eq!(written.len(), 16);
    }

    #[tokio::test]
    async fn test_rejects_non_image_without_writing() {
        let temp = TempDir::new().unwrap();
        let store = DiskImageStore::new(temp.path().join("uploads"), "/uploads", UploadPolicy::default());

        let err = store.store(upload("application/pdf", 16)).await.unwrap_err();

        assert!(matches!(err, UploadError::UnsupportedType(_)));
        assert_eq!(file_count(store.dir()), 0);
    }

    #[tokio::test]
    async fn test_rejects_oversized_without_writing() {
        let temp = TempDir::new().unwrap();
        let store = DiskImageStore::new(temp.path().join("uploads"), "/uploads/", UploadPolicy::new(8));

        let err = store.store(upload("image/png", 9)).await.unwrap_err();

        assert!(matches!(err, UploadError::TooLarge { limit: 8 }));
        assert_eq!(file_count(store.dir()), 0);
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let temp = TempDir::new().unwrap();
        let store = DiskImageStore::new(temp.path().join("uploads"), "/uploads", UploadPolicy::default());
        let stored = store.store(upload("image/gif", 4)).await.unwrap();
        assert_eq!(file_count(store.dir()), 1);

        store.remove(&stored).await.unwrap();
        assert_eq!(file_count(store.dir()), 0);

        // Already gone.
        store.remove(&stored).await.unwrap();
    }
}
