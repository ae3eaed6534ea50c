use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::auth::Claims;
use crate::database::models::{User, UserRole};
use crate::error::ApiError;
use crate::services::UserService;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins reach every row, everyone else only their own
    pub fn can_access(&self, owner_id: i32) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(ApiError::unauthorized)?;
    let claims = state.jwt.validate(token)?;
    let mut auth_user = AuthUser::try_from(claims)?;

    if state.config.security.validate_user {
        // Tokens outlive account changes: reload the row so deletions and
        // role changes apply immediately.
        let user = UserService::new(state.pool.clone())
            .find_by_id(auth_user.id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token presented for missing user {}", auth_user.id);
                ApiError::unauthorized("User no longer exists")
            })?;
        auth_user = AuthUser::from(user);
    }

    tracing::debug!("Authenticated {} ({}) as {}", auth_user.name, auth_user.id, auth_user.role);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty JWT token");
    }
    Ok(token)
}
