//! In-memory post repository - used in tests and when no data file is wanted.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use glow_core::domain::{NewPost, Post};
use glow_core::error::RepoError;
use glow_core::ports::PostRepository;

/// Post repository holding everything in a `Vec` behind an async `RwLock`.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    /// Seed the repository; `posts` should already be newest first.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn create_post(&self, fields: NewPost) -> Result<Post, RepoError> {
        fields.validate()?;

        let post = Post::new(fields, Utc::now());
        self.posts.write().await.insert(0, post.clone());
        Ok(post)
    }
}
