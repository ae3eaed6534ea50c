use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Access level of an account. Admins bypass ownership filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: 7,
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuu".to_string(),
            role: UserRole::User,
            first_name: Some("Alice".to_string()),
            last_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["name"], "alice");
        assert_eq!(value["role"], "User");
    }

    #[test]
    fn role_round_trips_through_its_name() {
        let role: UserRole = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(role.to_string(), "Admin");
        assert!(serde_json::from_str::<UserRole>("\"root\"").is_err());
    }
}
