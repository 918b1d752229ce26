//! Data Transfer Objects - request/response bodies for the API.

use serde::{Deserialize, Serialize};

use glow_core::domain::Post;

/// Multipart field names accepted by `POST /api/posts`.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const AUTHOR: &str = "author";
    pub const TAGS: &str = "tags";
    pub const CONTENT: &str = "content";
    pub const IMAGE_FILE: &str = "imageFile";
    pub const IMAGE_URL: &str = "imageURL";
}

/// Body of a `201 Created` from `POST /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub success: bool,
    pub post: Post,
}

impl CreatePostResponse {
    pub fn created(post: Post) -> Self {
        Self {
            success: true,
            post,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}
