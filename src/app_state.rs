use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::JwtKeys;
use crate::config::AppConfig;

/// Shared, read-only state handed to every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let jwt = JwtKeys::from_config(&config.security);
        Self {
            pool,
            config: Arc::new(config),
            jwt,
        }
    }
}
