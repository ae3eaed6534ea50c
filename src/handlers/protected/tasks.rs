// handlers/protected/tasks.rs - /api/tasks
use axum::{extract::State, Extension};
use sqlx::PgPool;

use crate::database::models::{Comment, Task, TaskWithComments};
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, AuthUser};
use crate::services::comment_service::NewTaskComment;
use crate::services::task_service::{TaskFilter, TaskInput, TaskUpdate};
use crate::services::TaskService;

/// GET /api/tasks?project_id=&status= - Visible tasks with their comments
pub async fn list(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiQuery(filter): ApiQuery<TaskFilter>,
) -> ApiResult<Vec<TaskWithComments>> {
    let tasks = TaskService::new(pool).list(&caller, filter).await?;
    Ok(ApiResponse::success(tasks))
}

/// GET /api/tasks/:id
pub async fn get(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<TaskWithComments> {
    let task = TaskService::new(pool).get(&caller, id).await?;
    Ok(ApiResponse::success(task))
}

/// POST /api/tasks
pub async fn create(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(input): ApiJson<TaskInput>,
) -> ApiResult<Task> {
    let task = TaskService::new(pool).create(&caller, input).await?;
    Ok(ApiResponse::created(task))
}

/// PUT /api/tasks/:id
pub async fn update(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<TaskUpdate>,
) -> ApiResult<()> {
    TaskService::new(pool).update(&caller, id, input).await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/tasks/:id
pub async fn delete(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<()> {
    TaskService::new(pool).delete(&caller, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /api/tasks/:id/comments
pub async fn add_comment(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<NewTaskComment>,
) -> ApiResult<Comment> {
    let comment = TaskService::new(pool).add_comment(&caller, id, &input.content).await?;
    Ok(ApiResponse::created(comment))
}
