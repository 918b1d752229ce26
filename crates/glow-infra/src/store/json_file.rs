//! Post store backed by a single JSON array file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::Mutex;

use glow_core::domain::{NewPost, Post};
use glow_core::error::RepoError;
use glow_core::ports::PostRepository;

/// Post store keeping the whole collection in one JSON file, newest first.
///
/// Every create rewrites the entire file. There is no partial-write
/// protection and no cross-process locking; writes from the same store
/// instance are serialized.
pub struct JsonFilePostStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty `[]` file if missing.
    pub async fn ensure_initialized(&self) -> Result<(), RepoError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| RepoError::Io(e.to_string()))?;
            }
        }

        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|e| RepoError::Io(e.to_string()))?;
        if !exists {
            tracing::info!(path = %self.path.display(), "Creating empty posts file");
            fs::write(&self.path, "[]")
                .await
                .map_err(|e| RepoError::Io(e.to_string()))?;
        }

        Ok(())
    }

    /// Read the file strictly. A missing or blank file is an empty collection.
    async fn load(&self) -> Result<Vec<Post>, RepoError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::Io(e.to_string())),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&text).map_err(|e| RepoError::Serialization(e.to_string()))
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), RepoError> {
        let body = serde_json::to_string_pretty(posts)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;

        fs::write(&self.path, body)
            .await
            .map_err(|e| RepoError::Io(e.to_string()))
    }
}

#[async_trait]
impl PostRepository for JsonFilePostStore {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        match self.load().await {
            Ok(posts) => Ok(posts),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read posts file, listing no posts"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn create_post(&self, fields: NewPost) -> Result<Post, RepoError> {
        fields.validate()?;

        let _guard = self.write_lock.lock().await;

        // A corrupt file is reported rather than overwritten.
        let mut posts = self.load().await?;
        let post = Post::new(fields, Utc::now());
        posts.insert(0, post.clone());
        self.persist(&posts).await?;

        tracing::debug!(post_id = post.id, total = posts.len(), "Post stored");
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            author: "Ada".to_string(),
            tags: vec!["rust".to_string()],
            content: "Body".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_ensure_initialized_creates_empty_array() {
        let temp = TempDir::new().unwrap();
        let store = JsonFilePostStore::new(temp.path().join("data").join("posts.json"));

        store.ensure_initialized().await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "[]");
        assert!(store.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_initialized_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let store = JsonFilePostStore::new(temp.path().join("posts.json"));
        store.ensure_initialized().await.unwrap();
        store.create_post(fields("Kept")).await.unwrap();

        store.ensure_initialized().await.unwrap();

        assert_eq!(store.list_posts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_prepends_and_persists() {
        let temp = TempDir::new().unwrap();
        let store = JsonFilePostStore::new(temp.path().join("posts.json"));
        store.ensure_initialized().await.unwrap();

        store.create_post(fields("First")).await.unwrap();
        let second = store.create_post(fields("Second")).await.unwrap();

        let posts = store.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0], second);
        assert_eq!(posts[1].title, "First");

        // Reopening the file sees the same collection.
        let reopened = JsonFilePostStore::new(store.path());
        assert_eq!(reopened.list_posts().await.unwrap(), posts);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() {
        let temp = TempDir::new().unwrap();
        let store = JsonFilePostStore::new(temp.path().join("posts.json"));
        store.create_post(fields("Pretty")).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\""));
    }

    #[tokio::test]
    async fn test_invalid_fields_leave_file_untouched() {
        let temp = TempDir::new().unwrap();
        let store = JsonFilePostStore::new(temp.path().join("posts.json"));
        store.ensure_initialized().await.unwrap();

        let mut invalid = fields("");
        invalid.content.clear();
        let err = store.create_post(invalid).await.unwrap_err();

        assert!(matches!(err, RepoError::Domain(_)));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_corrupt_file_lists_empty_and_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("posts.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFilePostStore::new(&path);

        assert!(store.list_posts().await.unwrap().is_empty());

        let err = store.create_post(fields("Lost?")).await.unwrap_err();
        assert!(matches!(err, RepoError::Serialization(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonFilePostStore::new(temp.path().join("nope.json"));
        assert!(store.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hand_written_dates_without_offset_are_kept() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[
  {"id": 2, "title": "Stamped", "author": "a", "tags": [], "content": "c", "image": null, "date": "2025-03-02T09:00:00.000Z"},
  {"id": 1, "title": "By hand", "author": "b", "content": "c", "date": "2025-03-01T10:00:00"}
]"#,
        )
        .unwrap();
        let store = JsonFilePostStore::new(&path);

        assert_eq!(store.list_posts().await.unwrap().len(), 2);

        store.create_post(fields("Fresh")).await.unwrap();
        let titles: Vec<String> = store
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Fresh", "Stamped", "By hand"]);
    }
}
