//! The "new post" form, used both for publishing and for local drafts.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};

use glow_core::domain::{NewPost, Post, parse_tags};

use crate::error::ClientError;

/// An image file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Read a file. The content type is sniffed from its bytes, falling
    /// back to the extension when the format is not recognized.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        let content_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or_else(|| content_type_from_extension(&file_name));

        Ok(Self {
            content_type: content_type.to_string(),
            file_name,
            bytes,
        })
    }

    /// `data:<type>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

fn content_type_from_extension(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Raw form input, as typed.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub author: String,
    /// Comma-separated.
    pub tags: String,
    pub content: String,
    pub image_url: Option<String>,
    pub image_file: Option<ImageAttachment>,
}

impl PostForm {
    /// Build a local-only draft. Blank title and author fall back to
    /// `Untitled` and `Anonymous`; an attached file is embedded as a data URL
    /// and wins over the URL field.
    pub fn into_draft(self, now: DateTime<Utc>) -> Post {
        let title = match self.title.trim() {
            "" => "Untitled".to_string(),
            t => t.to_string(),
        };
        let author = match self.author.trim() {
            "" => "Anonymous".to_string(),
            a => a.to_string(),
        };

        let image = self
            .image_file
            .as_ref()
            .filter(|f| !f.bytes.is_empty() && !f.content_type.is_empty())
            .map(ImageAttachment::to_data_url)
            .or_else(|| {
                self.image_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .map(String::from)
            });

        Post::new(
            NewPost {
                title,
                author,
                tags: parse_tags(&self.tags),
                content: self.content.trim().to_string(),
                image,
            },
            now,
        )
    }
}
