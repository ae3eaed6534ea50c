// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and service probes. Everything else lives under
// handlers::protected and sits behind jwt_auth_middleware.
pub mod auth;
pub mod system;
