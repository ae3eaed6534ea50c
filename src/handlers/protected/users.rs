// handlers/protected/users.rs - /api/users
use axum::{extract::State, Extension};
use sqlx::PgPool;

use crate::app_state::AppState;
use crate::database::models::User;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::user_service::UpdateUser;
use crate::services::UserService;

/// GET /api/users - All users for admins, the caller otherwise
pub async fn list(State(pool): State<PgPool>, Extension(caller): Extension<AuthUser>) -> ApiResult<Vec<User>> {
    let users = UserService::new(pool).list(&caller).await?;
    Ok(ApiResponse::success(users))
}

/// GET /api/users/me - The authenticated account
pub async fn me(State(pool): State<PgPool>, Extension(caller): Extension<AuthUser>) -> ApiResult<User> {
    let user = UserService::new(pool).get(&caller, caller.id).await?;
    Ok(ApiResponse::success(user))
}

/// GET /api/users/:id
pub async fn get(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<User> {
    let user = UserService::new(pool).get(&caller, id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/users/:id - Profile, password and (admins only) role
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateUser>,
) -> ApiResult<()> {
    UserService::new(state.pool.clone())
        .with_bcrypt_cost(state.config.security.bcrypt_cost)
        .update(&caller, id, input)
        .await?;
    Ok(ApiResponse::no_content())
}

/// DELETE /api/users/:id
pub async fn delete(
    State(pool): State<PgPool>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<()> {
    UserService::new(pool).delete(&caller, id).await?;
    Ok(ApiResponse::no_content())
}
