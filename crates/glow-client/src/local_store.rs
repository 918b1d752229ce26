//! Machine-local key/value storage for drafts and preferences.
//!
//! A single JSON object on disk plays the part browser local storage plays
//! for the web front-end. Nothing here is ever sent to the server.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use glow_core::domain::Post;

use crate::error::ClientError;
use crate::theme::Theme;

pub const DRAFTS_KEY: &str = "glow_local_posts";
pub const THEME_KEY: &str = "glow_theme";

pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Local drafts, newest first. Unreadable data counts as no drafts.
    pub async fn drafts(&self) -> Vec<Post> {
        let Some(value) = self.read_map().await.remove(DRAFTS_KEY) else {
            return Vec::new();
        };

        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable local drafts");
            Vec::new()
        })
    }

    pub async fn save_draft(&self, post: Post) -> Result<(), ClientError> {
        let mut drafts = self.drafts().await;
        drafts.insert(0, post);

        let mut map = self.read_map().await;
        map.insert(DRAFTS_KEY.to_string(), serde_json::to_value(drafts)?);
        self.write_map(&map).await
    }

    pub async fn theme(&self) -> Option<Theme> {
        self.read_map()
            .await
            .get(THEME_KEY)
            .and_then(Value::as_str)
            .and_then(Theme::parse)
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), ClientError> {
        let mut map = self.read_map().await;
        map.insert(THEME_KEY.to_string(), Value::from(theme.as_str()));
        self.write_map(&map).await
    }

    async fn read_map(&self) -> Map<String, Value> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Local store unreadable");
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::warn!(path = %self.path.display(), "Local store is not a JSON object, starting fresh");
                Map::new()
            }
        }
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::PostForm;
    use chrono::Utc;
    use tempfile::TempDir;

    fn draft(title: &str) -> Post {
        PostForm {
            title: title.to_string(),
            content: "c".to_string(),
            ..PostForm::default()
        }
        .into_draft(Utc::now())
    }

    #[tokio::test]
    async fn test_drafts_are_prepended_and_persisted() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path().join("nested").join("local.json"));
        assert!(store.drafts().await.is_empty());

        store.save_draft(draft("one")).await.unwrap();
        store.save_draft(draft("two")).await.unwrap();

        let reopened = LocalStore::new(store.path());
        let titles: Vec<String> = reopened.drafts().await.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["two", "one"]);
    }

    #[tokio::test]
    async fn test_theme_round_trips_alongside_drafts() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path().join("local.json"));
        assert_eq!(store.theme().await, None);

        store.save_draft(draft("kept")).await.unwrap();
        store.set_theme(Theme::Light).await.unwrap();

        assert_eq!(store.theme().await, Some(Theme::Light));
        assert_eq!(store.drafts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_store_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("local.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = LocalStore::new(&path);

        assert!(store.drafts().await.is_empty());
        assert_eq!(store.theme().await, None);

        store.set_theme(Theme::Dark).await.unwrap();
        assert_eq!(store.theme().await, Some(Theme::Dark));
    }
}
