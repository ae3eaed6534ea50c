// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here receives the caller as `Extension<AuthUser>` and hands it
// to the matching service, which applies the ownership rule.
pub mod comments;
pub mod grades;
pub mod projects;
pub mod tasks;
pub mod users;
