use async_trait::async_trait;

use crate::domain::{ImageUpload, StoredImage};
use crate::error::UploadError;

/// Image store - persists uploaded post images somewhere publicly served.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Check the upload against the store's policy and persist it.
    /// Nothing is written when the check fails.
    async fn store(&self, upload: ImageUpload) -> Result<StoredImage, UploadError>;

    /// Delete a previously stored image. Removing one that is already gone
    /// is not an error.
    async fn remove(&self, image: &StoredImage) -> Result<(), UploadError>;
}
