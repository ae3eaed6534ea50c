pub mod comment_service;
pub mod grade_service;
pub mod project_service;
pub mod task_service;
pub mod user_service;

pub use comment_service::CommentService;
pub use grade_service::GradeService;
pub use project_service::ProjectService;
pub use task_service::TaskService;
pub use user_service::UserService;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::manager::DatabaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(err.into())
    }
}

/// Trim a required text field, rejecting blank input
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trim optional text, mapping blank input to None
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  Website  ").unwrap(), "Website");
        assert!(matches!(
            required_text("name", "   "),
            Err(ServiceError::Validation { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  notes ")), Some("notes".to_string()));
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(optional_text(None), None);
    }
}
