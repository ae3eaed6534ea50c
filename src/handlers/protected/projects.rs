// handlers/protected/projects.rs - /api/projects
use axum::{extract::State, Extension};
use sqlx::PgPool;

use crate::database::models::{Grade, Project, ProjectWithTasks};
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::project_service::ProjectInput;
use crate::services::ProjectService;

/// GET /api/projects - Visible projects with their tasks
pub async fn list(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Vec<ProjectWithTasks>> {
    let projects = ProjectService::new(pool).list(&caller).await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/projects/:id
pub async fn get(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<ProjectWithTasks> {
    let project = ProjectService::new(pool).get(&caller, id).await?;
    Ok(ApiResponse::success(project))
}

/// POST /api/projects - Owned by the caller
pub async fn create(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> ApiResult<Project> {
    let project = ProjectService::new(pool).create(&caller, input).await?;
    Ok(ApiResponse::created(project))
}

/// PUT /api/projects/:id
pub async fn update(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> ApiResult<()> {
    ProjectService::new(pool).update(&caller, id, input).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/projects/:id - Cascades to tasks, comments and grades
pub async fn delete(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<()> {
    ProjectService::new(pool).delete(&caller, id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /api/projects/:id/grades - Grades the project received
pub async fn grades(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Vec<Grade>> {
    let grades = ProjectService::new(pool).grades(&caller, id).await?;
    Ok(ApiResponse::success(grades))
}
