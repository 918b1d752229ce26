//! Domain entities - the core business objects.

mod post;
mod upload;

pub use post::{NewPost, Post, parse_tags};
pub use upload::{
    ALLOWED_IMAGE_TYPES, DEFAULT_MAX_UPLOAD_BYTES, ImageUpload, StoredImage, UploadPolicy,
    sanitize_file_name, stored_file_name,
};
