pub mod app;
pub mod app_state;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod services;

pub use app::app;
pub use app_state::AppState;
