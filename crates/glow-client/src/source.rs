//! Where the client gets its posts: the HTTP API or a static JSON file.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};

use glow_core::domain::Post;
use glow_shared::dto::{CreatePostResponse, fields};

use crate::error::ClientError;
use crate::form::PostForm;

/// Default location of the static posts file, relative to the site root.
pub const DEFAULT_POSTS_JSON_PATH: &str = "data/posts.json";

#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError>;
}

/// The Glow HTTP API.
pub struct ApiSource {
    client: reqwest::Client,
    base_url: String,
}

impl ApiSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn posts_url(&self) -> String {
        format!("{}/api/posts", self.base_url)
    }

    /// Submit `form` as multipart to `POST /api/posts`.
    pub async fn publish(&self, form: PostForm) -> Result<Post, ClientError> {
        let mut body = Form::new()
            .text(fields::TITLE, form.title)
            .text(fields::AUTHOR, form.author)
            .text(fields::TAGS, form.tags)
            .text(fields::CONTENT, form.content);

        if let Some(url) = form.image_url {
            body = body.text(fields::IMAGE_URL, url);
        }
        if let Some(file) = form.image_file {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            body = body.part(fields::IMAGE_FILE, part);
        }

        let resp = self.client.post(self.posts_url()).multipart(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        interpret_publish_response(status, &text)
    }
}

#[async_trait]
impl PostSource for ApiSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError> {
        let resp = self
            .client
            .get(self.posts_url())
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("Failed to fetch posts: {}", status.as_u16()),
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("Posts response is not a post list: {}", e)))
    }
}

/// Turn the server's reply to a publish into the created post or a
/// user-facing error message.
fn interpret_publish_response(status: StatusCode, text: &str) -> Result<Post, ClientError> {
    let data: Option<serde_json::Value> = if text.trim().is_empty() {
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: format!(
                    "Server returned status {} with empty body.",
                    status.as_u16()
                ),
            });
        }
        None
    } else {
        let value = serde_json::from_str(text).map_err(|_| {
            ClientError::InvalidResponse(format!("Server returned invalid JSON: {}", text))
        })?;
        Some(value)
    };

    if !status.is_success() {
        let message = data
            .as_ref()
            .and_then(|d| d.get("error"))
            .and_then(|e| e.as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let data = data.ok_or_else(|| {
        ClientError::InvalidResponse("Server returned an empty body".to_string())
    })?;
    let created: CreatePostResponse = serde_json::from_value(data)?;
    Ok(created.post)
}

/// Where a static posts file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticLocation {
    Url(String),
    Path(PathBuf),
}

impl StaticLocation {
    /// `http(s)://...` is a URL, anything else a filesystem path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            StaticLocation::Url(raw.to_string())
        } else {
            StaticLocation::Path(PathBuf::from(raw))
        }
    }
}

/// Read-only posts from a fixed JSON file. Any failure yields no posts.
pub struct StaticJsonSource {
    client: reqwest::Client,
    location: StaticLocation,
}

impl StaticJsonSource {
    pub fn new(location: StaticLocation) -> Self {
        Self {
            client: reqwest::Client::new(),
            location,
        }
    }

    async fn read(&self) -> Result<Vec<Post>, ClientError> {
        let text = match &self.location {
            StaticLocation::Path(path) => tokio::fs::read_to_string(path).await?,
            StaticLocation::Url(url) => {
                let resp = self
                    .client
                    .get(url)
                    .header(reqwest::header::CACHE_CONTROL, "no-store")
                    .send()
                    .await?;
                if !resp.status().is_success() {
                    return Err(ClientError::Api {
                        status: resp.status().as_u16(),
                        message: format!("Static posts unavailable: {}", resp.status()),
                    });
                }
                resp.text().await?
            }
        };

        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for StaticJsonSource {
    fn default() -> Self {
        Self::new(StaticLocation::parse(DEFAULT_POSTS_JSON_PATH))
    }
}

#[async_trait]
impl PostSource for StaticJsonSource {
    async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError> {
        match self.read().await {
            Ok(posts) => Ok(posts),
            Err(e) => {
                tracing::warn!(location = ?self.location, error = %e, "Could not load posts.json");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use tempfile::TempDir;

    const POSTS_JSON: &str = r#"[{"id": 2, "title": "Two", "author": "b", "tags": ["x"], "content": "c", "image": null, "date": "2025-01-02T00:00:00.000Z"},
        {"id": 1, "title": "One", "author": "a", "tags": [], "content": "c", "image": null, "date": "2025-01-01T00:00:00.000Z"}]"#;

    #[tokio::test]
    async fn test_api_source_fetches_posts() {
        let base = serve_once("200 OK", POSTS_JSON).await;
        let posts = ApiSource::new(base).fetch_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Two");
    }

    #[tokio::test]
    async fn test_api_source_surfaces_server_errors() {
        let base = serve_once("500 Internal Server Error", r#"{"error":"Server error"}"#).await;
        let err = ApiSource::new(base).fetch_posts().await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_static_source_reads_local_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("posts.json");
        std::fs::write(&path, POSTS_JSON).unwrap();

        let source = StaticJsonSource::new(StaticLocation::Path(path));
        assert_eq!(source.fetch_posts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_static_source_degrades_to_empty() {
        let temp = TempDir::new().unwrap();
        let missing = StaticJsonSource::new(StaticLocation::Path(temp.path().join("none.json")));
        assert!(missing.fetch_posts().await.unwrap().is_empty());

        let bad = temp.path().join("bad.json");
        std::fs::write(&bad, r#"{"not": "a list"}"#).unwrap();
        let bad = StaticJsonSource::new(StaticLocation::Path(bad));
        assert!(bad.fetch_posts().await.unwrap().is_empty());

        let base = serve_once("404 Not Found", "").await;
        let remote = StaticJsonSource::new(StaticLocation::Url(format!("{}/data/posts.json", base)));
        assert!(remote.fetch_posts().await.unwrap().is_empty());
    }

    #[test]
    fn test_static_location_parse() {
        assert_eq!(
            StaticLocation::parse("https://me.github.io/blog/data/posts.json"),
            StaticLocation::Url("https://me.github.io/blog/data/posts.json".to_string())
        );
        assert_eq!(
            StaticLocation::parse("data/posts.json"),
            StaticLocation::Path(PathBuf::from("data/posts.json"))
        );
    }

    #[test]
    fn test_publish_response_success() {
        let body = r#"{"success": true, "post": {"id": 7, "title": "Fresh", "author": "a", "tags": [], "content": "c", "image": "/uploads/7-x.png", "date": "2025-01-03T00:00:00.000Z"}}"#;
        let post = interpret_publish_response(StatusCode::CREATED, body).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.image.as_deref(), Some("/uploads/7-x.png"));
    }

    #[test]
    fn test_publish_response_error_messages() {
        let err = interpret_publish_response(
            StatusCode::BAD_REQUEST,
            r#"{"error": "title, author and content are required"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "title, author and content are required");

        let err = interpret_publish_response(StatusCode::BAD_GATEWAY, "{}").unwrap_err();
        assert_eq!(err.to_string(), "Server error: 502");

        let err = interpret_publish_response(StatusCode::PAYLOAD_TOO_LARGE, "  ").unwrap_err();
        assert_eq!(err.to_string(), "Server returned status 413 with empty body.");

        let err = interpret_publish_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>").unwrap_err();
        assert_eq!(err.to_string(), "Server returned invalid JSON: <html>");
    }
}
