use serde::Deserialize;
use sqlx::PgPool;

use super::{optional_text, required_text, ServiceError};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::database::manager::DatabaseError;
use crate::database::models::{User, UserRole};
use crate::middleware::AuthUser;

pub const MIN_PASSWORD_LENGTH: usize = 6;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, first_name, last_name, created_at";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    #[serde(alias = "username")]
    pub name: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    #[serde(alias = "username")]
    pub name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Leave unset to keep the current password
    pub password: Option<String>,
    /// Only admins may change roles
    pub role: Option<UserRole>,
}

pub struct UserService {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Create a new account. Registration always yields the User role.
    pub async fn register(&self, input: RegisterUser) -> Result<User, ServiceError> {
        let name = required_text("name", &input.name)?;
        let email = validate_email(&input.email)?;
        validate_password(&input.password)?;

        if self.name_taken(&name, None).await? {
            return Err(ServiceError::Duplicate("Username already exists".to_string()));
        }
        if self.email_taken(&email, None).await? {
            return Err(ServiceError::Duplicate("Email already exists".to_string()));
        }

        let password_hash = hash_password_blocking(input.password, self.bcrypt_cost).await?;

        let sql = format!(
            "INSERT INTO users (name, email, password_hash, role, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&name)
            .bind(&email)
            .bind(&password_hash)
            .bind(UserRole::User)
            .bind(optional_text(input.first_name.as_deref()))
            .bind(optional_text(input.last_name.as_deref()))
            .fetch_one(&self.pool)
            .await
            .map_err(duplicate_user)?;

        tracing::info!("Registered user {} ({})", user.name, user.id);
        Ok(user)
    }

    /// Check a name/password pair. Unknown names and bad passwords are indistinguishable.
    pub async fn authenticate(&self, name: &str, password: &str) -> Result<User, ServiceError> {
        let user = match self.find_by_name(name.trim()).await? {
            Some(user) => user,
            None => return Err(failed_login(name)),
        };

        if verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
            Ok(user)
        } else {
            Err(failed_login(name))
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>, ServiceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE name = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Admins see every account, everyone else only their own
    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<User>, ServiceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE ($1 OR id = $2) ORDER BY id");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(caller.is_admin())
            .bind(caller.id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<User, ServiceError> {
        if !caller.can_access(id) {
            return Err(user_not_found());
        }
        self.find_by_id(id).await?.ok_or_else(user_not_found)
    }

    pub async fn update(&self, caller: &AuthUser, id: i32, input: UpdateUser) -> Result<(), ServiceError> {
        let current = self.get(caller, id).await?;

        let name = required_text("name", &input.name)?;
        let email = validate_email(&input.email)?;

        let role = match input.role {
            Some(role) if role != current.role => {
                if !caller.is_admin() {
                    return Err(ServiceError::Forbidden("Only admins can change roles".to_string()));
                }
                tracing::info!("User {} changed role of {} to {}", caller.id, id, role);
                role
            }
            _ => current.role,
        };

        if self.name_taken(&name, Some(id)).await? {
            return Err(ServiceError::Duplicate("Username already exists".to_string()));
        }
        if self.email_taken(&email, Some(id)).await? {
            return Err(ServiceError::Duplicate("Email already exists".to_string()));
        }

        let password_hash = match input.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                hash_password_blocking(password.to_string(), self.bcrypt_cost).await?
            }
            None => current.password_hash,
        };

        sqlx::query(
            "UPDATE users
             SET name = $1, email = $2, first_name = $3, last_name = $4, password_hash = $5, role = $6
             WHERE id = $7",
        )
        .bind(&name)
        .bind(&email)
        .bind(optional_text(input.first_name.as_deref()))
        .bind(optional_text(input.last_name.as_deref()))
        .bind(&password_hash)
        .bind(role)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(duplicate_user)?;

        Ok(())
    }

    /// Remove an account and, through cascades, everything it owns
    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        if !caller.can_access(id) {
            return Err(user_not_found());
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found());
        }
        tracing::info!("User {} deleted account {}", caller.id, id);
        Ok(())
    }

    /// Operator path for granting or revoking admin rights
    pub async fn set_role(&self, name: &str, role: UserRole) -> Result<User, ServiceError> {
        let sql = format!("UPDATE users SET role = $1 WHERE name = $2 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!("Set role of {} to {}", user.name, role);
        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, ServiceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn name_taken(&self, name: &str, except: Option<i32>) -> Result<bool, ServiceError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE name = $1 AND ($2::INTEGER IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool, ServiceError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::INTEGER IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }
}

fn user_not_found() -> ServiceError {
    ServiceError::NotFound("User not found".to_string())
}

fn failed_login(name: &str) -> ServiceError {
    tracing::warn!("Failed login attempt for '{}'", name);
    ServiceError::InvalidCredentials
}

/// Concurrent registrations can pass the existence checks and still collide
/// on the unique indexes.
fn duplicate_user(err: sqlx::Error) -> ServiceError {
    match DatabaseError::from(err) {
        DatabaseError::UniqueViolation(constraint) if constraint == "users_email_key" => {
            ServiceError::Duplicate("Email already exists".to_string())
        }
        DatabaseError::UniqueViolation(_) => ServiceError::Duplicate("Username already exists".to_string()),
        other => ServiceError::Database(other),
    }
}

pub(crate) fn validate_email(raw: &str) -> Result<String, ServiceError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ServiceError::validation("email", "must be a valid email address"));
    }
    Ok(email)
}

pub(crate) fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::validation(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert_eq!(validate_email(" Alice@Example.com ").unwrap(), "alice@example.com");
        assert!(validate_email("a.b+tag@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "alice", "@example.com", "alice@", "alice@example", "a@b@c.com", "al ice@example.com", "alice@.com"] {
            assert!(validate_email(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn password_length_is_enforced() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn register_payload_accepts_username_alias() {
        let input: RegisterUser = serde_json::from_value(serde_json::json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "hunter22"
        }))
        .unwrap();
        assert_eq!(input.name, "carol");
        assert!(input.first_name.is_none());
    }
}
