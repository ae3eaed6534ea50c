// handlers/public/auth.rs - POST /api/users/register, POST /api/users/login
//
// Also mounted under /api/auth/{register,login}.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::database::models::User;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::user_service::RegisterUser;
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "name")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user_id: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: User,
}

/// POST /api/users/register - Create an account and return a token for it
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterUser>,
) -> ApiResult<RegisterResponse> {
    let user = UserService::new(state.pool.clone())
        .with_bcrypt_cost(state.config.security.bcrypt_cost)
        .register(input)
        .await?;
    let token = state.jwt.issue(&user)?;

    Ok(ApiResponse::success(RegisterResponse {
        token,
        user_id: user.id,
        message: "User registered successfully".to_string(),
    }))
}

/// POST /api/users/login - Exchange name and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = UserService::new(state.pool.clone())
        .authenticate(&input.username, &input.password)
        .await?;
    let token = state.jwt.issue(&user)?;

    tracing::info!("User {} ({}) logged in", user.name, user.id);

    Ok(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.expires_in(),
        user,
    }))
}
