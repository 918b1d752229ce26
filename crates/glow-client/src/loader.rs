//! Building a fresh [`BlogState`] from the configured post source.

use crate::error::ClientError;
use crate::local_store::LocalStore;
use crate::source::{ApiSource, PostSource, StaticJsonSource, StaticLocation};
use crate::state::BlogState;

/// Where the blog's posts come from.
pub enum BlogSource {
    /// The HTTP API. Load failures are surfaced.
    Api(ApiSource),
    /// A read-only posts file, merged with local drafts.
    Static(StaticJsonSource),
}

impl BlogSource {
    /// API mode when a base URL is given, otherwise the static file.
    pub fn select(api: Option<&str>, static_json: &str) -> Self {
        match api {
            Some(base_url) => BlogSource::Api(ApiSource::new(base_url)),
            None => BlogSource::Static(StaticJsonSource::new(StaticLocation::parse(static_json))),
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, BlogSource::Api(_))
    }

    /// Load posts and the saved theme into a new state showing the first
    /// page. Drafts in `local` only join the static collection.
    pub async fn load_state(&self, local: &LocalStore) -> Result<BlogState, ClientError> {
        let mut state = BlogState::new(local.theme().await.unwrap_or_default());

        match self {
            BlogSource::Api(api) => {
                let posts = api.fetch_posts().await?;
                tracing::debug!(count = posts.len(), "Loaded posts from API");
                state.load(posts, Vec::new());
            }
            BlogSource::Static(source) => {
                let disk = source.fetch_posts().await?;
                let drafts = local.drafts().await;
                tracing::debug!(disk = disk.len(), drafts = drafts.len(), "Loaded static posts");
                state.load(disk, drafts);
            }
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::PostForm;
    use crate::test_support::serve_once;
    use crate::theme::Theme;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    const POSTS_JSON: &str = r#"[
        {"id": 2, "title": "Newer", "author": "b", "tags": ["x"], "content": "c", "image": null, "date": "2025-01-02T00:00:00.000Z"},
        {"id": 1, "title": "Older", "author": "a", "tags": [], "content": "c", "image": null, "date": "2025-01-01T00:00:00.000Z"}
    ]"#;

    fn titles(state: &BlogState) -> Vec<String> {
        state.visible().iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_select_mode() {
        assert!(BlogSource::select(Some("http://localhost:8000"), "data/posts.json").is_api());
        assert!(!BlogSource::select(None, "data/posts.json").is_api());
    }

    #[tokio::test]
    async fn test_static_mode_merges_local_drafts_by_date() {
        let temp = TempDir::new().unwrap();
        let posts = temp.path().join("posts.json");
        std::fs::write(&posts, POSTS_JSON).unwrap();

        let local = LocalStore::new(temp.path().join("local.json"));
        let draft = PostForm {
            title: "Draft".to_string(),
            content: "c".to_string(),
            ..PostForm::default()
        }
        .into_draft(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());
        local.save_draft(draft).await.unwrap();
        local.set_theme(Theme::Light).await.unwrap();

        let source = BlogSource::select(None, posts.to_str().unwrap());
        let state = source.load_state(&local).await.unwrap();

        assert_eq!(titles(&state), vec!["Newer", "Draft", "Older"]);
        assert_eq!(state.theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_static_mode_without_posts_file_shows_drafts_only() {
        let temp = TempDir::new().unwrap();
        let local = LocalStore::new(temp.path().join("local.json"));
        local
            .save_draft(
                PostForm {
                    title: "Only".to_string(),
                    ..PostForm::default()
                }
                .into_draft(Utc::now()),
            )
            .await
            .unwrap();

        let missing = temp.path().join("missing.json");
        let state = BlogSource::select(None, missing.to_str().unwrap())
            .load_state(&local)
            .await
            .unwrap();

        assert_eq!(titles(&state), vec!["Only"]);
        assert_eq!(state.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_api_mode_ignores_local_drafts() {
        let temp = TempDir::new().unwrap();
        let local = LocalStore::new(temp.path().join("local.json"));
        local
            .save_draft(PostForm::default().into_draft(Utc::now()))
            .await
            .unwrap();

        let base = serve_once("200 OK", POSTS_JSON).await;
        let state = BlogSource::select(Some(&base), "unused.json")
            .load_state(&local)
            .await
            .unwrap();

        assert_eq!(titles(&state), vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_api_mode_surfaces_load_failure() {
        let temp = TempDir::new().unwrap();
        let local = LocalStore::new(temp.path().join("local.json"));

        let base = serve_once("503 Service Unavailable", "").await;
        let err = BlogSource::select(Some(&base), "unused.json")
            .load_state(&local)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 503, .. }));

        // Nothing listens on a port whose listener has been dropped.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = BlogSource::select(Some(&base), "unused.json")
            .load_state(&local)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
