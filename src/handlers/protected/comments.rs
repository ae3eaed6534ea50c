use axum::{extract::State, Extension};
use sqlx::PgPool;

use crate::database::models::Comment;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, AuthUser};
use crate::services::comment_service::{CommentFilter, CommentInput, CommentUpdate};
use crate::services::CommentService;

/// GET /api/comments?task_id=
pub async fn list(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiQuery(filter): ApiQuery<CommentFilter>,
) -> ApiResult<Vec<Comment>> {
    let comments = CommentService::new(pool).list(&caller, filter).await?;
    Ok(ApiResponse::success(comments))
}

/// GET /api/comments/:id
pub async fn get(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Comment> {
    let comment = CommentService::new(pool).get(&caller, id).await?;
    Ok(ApiResponse::success(comment))
}

/// POST /api/comments
pub async fn create(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(input): ApiJson<CommentInput>,
) -> ApiResult<Comment> {
    let comment = CommentService::new(pool).create(&caller, input).await?;
    Ok(ApiResponse::created(comment))
}

/// PUT /api/comments/:id
pub async fn update(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<CommentUpdate>,
) -> ApiResult<()> {
    CommentService::new(pool).update(&caller, id, input).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/comments/:id
pub async fn delete(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<()> {
    CommentService::new(pool).delete(&caller, id).await?;
    Ok(ApiResponse::no_content())
}
