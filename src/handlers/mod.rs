// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (Bearer JWT)
pub mod protected; // JWT authentication required (/api/*)
pub mod public; // No authentication required (/, /health, register, login)
