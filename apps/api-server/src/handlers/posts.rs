//! Post handlers - the five CRUD endpoints.

use actix_web::{HttpResponse, web};
use blog_core::domain::PostDraft;
use blog_shared::MessageBody;
use blog_shared::dto::PostRequest;
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn draft(req: PostRequest) -> PostDraft {
    PostDraft::new(req.title, req.content, req.author)
}

/// Reject a path id that is not a UUID before it reaches the store.
///
/// Reads and deletes report this as a server fault, updates as a bad request.
fn post_id(raw: &str, malformed: fn(String) -> AppError) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| {
        tracing::debug!(id = raw, "Malformed post id");
        malformed(format!("Invalid post id \"{raw}\": {e}"))
    })
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.insert(draft(body.into_inner())).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /posts - newest first
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = post_id(&id, AppError::Internal)?;
    let post = state.posts.get_by_id(&id.to_string()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /posts/{id}
///
/// Title and content are replaced; an omitted author keeps the stored one.
pub async fn update_post(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = post_id(&id, AppError::BadRequest)?;
    let post = state
        .posts
        .update_by_id(&id.to_string(), draft(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = post_id(&id, AppError::Internal)?;
    state.posts.delete_by_id(&id.to_string()).await?;
    Ok(HttpResponse::Ok().json(MessageBody::new("Post deleted successfully")))
}
