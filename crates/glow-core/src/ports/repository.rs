use async_trait::async_trait;

use crate::domain::{NewPost, Post};
use crate::error::RepoError;

/// Post repository - the persistence boundary for posts.
///
/// Posts are only ever listed or created; there is no update or delete.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest submission first.
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError>;

    /// Validate `fields`, stamp `id`/`date`, and store the post at the front.
    async fn create_post(&self, fields: NewPost) -> Result<Post, RepoError>;
}
