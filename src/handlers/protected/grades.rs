use axum::{extract::State, Extension};
use sqlx::PgPool;

use crate::database::models::Grade;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, AuthUser};
use crate::services::grade_service::{GradeFilter, GradeInput, GradeUpdate};
use crate::services::GradeService;

/// GET /api/grades?project_id= - Grades given by the caller
pub async fn list(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiQuery(filter): ApiQuery<GradeFilter>,
) -> ApiResult<Vec<Grade>> {
    let grades = GradeService::new(pool).list(&caller, filter).await?;
    Ok(ApiResponse::success(grades))
}

/// GET /api/grades/:id
pub async fn get(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Grade> {
    let grade = GradeService::new(pool).get(&caller, id).await?;
    Ok(ApiResponse::success(grade))
}

/// POST /api/grades - Value must be within 0..=20
pub async fn create(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(input): ApiJson<GradeInput>,
) -> ApiResult<Grade> {
    let grade = GradeService::new(pool).create(&caller, input).await?;
    Ok(ApiResponse::created(grade))
}

/// PUT /api/grades/:id
pub async fn update(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<GradeUpdate>,
) -> ApiResult<()> {
    GradeService::new(pool).update(&caller, id, input).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/grades/:id
pub async fn delete(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<()> {
    GradeService::new(pool).delete(&caller, id).await?;
    Ok(ApiResponse::no_content())
}
