//! Multipart form reading for post submissions.

use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

use glow_core::domain::{ImageUpload, NewPost, UploadPolicy, parse_tags};
use glow_shared::dto::fields;

use crate::middleware::error::{AppError, AppResult};

/// Upper bound for a single text field.
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

/// A fully read `POST /api/posts` form.
///
/// The image, if any, is held in memory; nothing has been written yet.
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: String,
    pub author: String,
    pub tags: String,
    pub content: String,
    pub image_url: Option<String>,
    pub image_file: Option<ImageUpload>,
}

impl PostForm {
    /// Drain the multipart stream. Type and size of `imageFile` are checked
    /// while reading so a bad upload is rejected before it is buffered whole.
    pub async fn read(mut payload: Multipart, policy: UploadPolicy) -> AppResult<Self> {
        let mut form = PostForm::default();

        while let Some(field) = payload.try_next().await? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                fields::IMAGE_FILE => form.image_file = read_image(field, policy).await?,
                fields::TITLE => form.title = read_text(field).await?,
                fields::AUTHOR => form.author = read_text(field).await?,
                fields::TAGS => form.tags = read_text(field).await?,
                fields::CONTENT => form.content = read_text(field).await?,
                fields::IMAGE_URL => {
                    let url = read_text(field).await?;
                    let url = url.trim();
                    form.image_url = (!url.is_empty()).then(|| url.to_string());
                }
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown form field");
                    read_text(field).await?;
                }
            }
        }

        Ok(form)
    }

    /// Post fields without the uploaded file; `image` carries the URL if one was given.
    pub fn new_post(&self) -> NewPost {
        NewPost {
            title: self.title.clone(),
            author: self.author.clone(),
            tags: parse_tags(&self.tags),
            content: self.content.clone(),
            image: self.image_url.clone(),
        }
    }
}

async fn read_text(mut field: Field) -> AppResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::PayloadTooLarge("Form field too large".to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read the `imageFile` part. An empty part without a file name means the
/// user did not choose a file.
async fn read_image(mut field: Field, policy: UploadPolicy) -> AppResult<Option<ImageUpload>> {
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();
    let content_type = field
        .content_type()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();

    if !file_name.is_empty() {
        policy.check_type(&content_type)?;
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        policy.check_size(bytes.len() + chunk.len())?;
        bytes.extend_from_slice(&chunk);
    }

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    policy.check_type(&content_type)?;

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes,
    }))
}
