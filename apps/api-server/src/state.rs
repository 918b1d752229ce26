//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use glow_core::domain::UploadPolicy;
use glow_core::ports::{ImageStore, PostRepository};
use glow_infra::{DiskImageStore, JsonFilePostStore};

use crate::config::AppConfig;

/// URL prefix uploaded images are served under.
pub const UPLOADS_PUBLIC_PREFIX: &str = "/uploads";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub images: Arc<dyn ImageStore>,
    pub upload_policy: UploadPolicy,
}

impl AppState {
    /// Build the file-backed state, creating the data file and uploads
    /// directory when missing.
    pub async fn new(config: &AppConfig) -> io::Result<Self> {
        let policy = UploadPolicy::new(config.max_upload_bytes);

        let store = JsonFilePostStore::new(&config.data_file);
        store.ensure_initialized().await.map_err(|e| {
            tracing::error!("Failed to prepare posts file: {}", e);
            io::Error::other(e.to_string())
        })?;

        let images = DiskImageStore::new(config.uploads_dir(), UPLOADS_PUBLIC_PREFIX, policy);
        images.ensure_dir().await.map_err(|e| {
            tracing::error!("Failed to prepare uploads directory: {}", e);
            io::Error::other(e.to_string())
        })?;

        tracing::info!(
            data_file = %config.data_file.display(),
            uploads = %config.uploads_dir().display(),
            "Application state initialized"
        );

        Ok(Self::from_parts(Arc::new(store), Arc::new(images), policy))
    }

    pub fn from_parts(
        posts: Arc<dyn PostRepository>,
        images: Arc<dyn ImageStore>,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            posts,
            images,
            upload_policy,
        }
    }
}
