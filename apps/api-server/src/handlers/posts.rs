//! Post handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use glow_shared::dto::CreatePostResponse;

use super::form::PostForm;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts
///
/// Multipart form with `title`, `author`, `tags`, `content` and either an
/// `imageFile` upload or an `imageURL`. The image is written only once the
/// text fields are known to be valid, and removed again if the post cannot
/// be saved.
pub async fn create_post(
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = PostForm::read(payload, state.upload_policy).await?;

    let mut fields = form.new_post();
    fields.validate()?;

    let stored = match form.image_file {
        Some(upload) => {
            let stored = state.images.store(upload).await?;
            fields.image = Some(stored.public_path.clone());
            Some(stored)
        }
        None => None,
    };

    let post = match state.posts.create_post(fields).await {
        Ok(post) => post,
        Err(err) => {
            if let Some(image) = &stored {
                if let Err(cleanup) = state.images.remove(image).await {
                    tracing::warn!(file = %image.file_name, error = %cleanup, "Failed to remove orphaned image");
                }
            }
            return Err(err.into());
        }
    };
    tracing::info!(post_id = post.id, title = %post.title, "Post created");

    Ok(HttpResponse::Created().json(CreatePostResponse::created(post)))
}
