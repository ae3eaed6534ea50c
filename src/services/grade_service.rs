use serde::Deserialize;
use sqlx::PgPool;

use super::ServiceError;
use crate::database::models::grade::{is_valid_grade, MAX_GRADE, MIN_GRADE};
use crate::database::models::Grade;
use crate::middleware::AuthUser;

const GRADE_COLUMNS: &str = "id, value, comment, created_at, project_id, user_id";

#[derive(Debug, Clone, Deserialize)]
pub struct GradeInput {
    pub value: i32,
    #[serde(default)]
    pub comment: Option<String>,
    pub project_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeUpdate {
    pub value: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeFilter {
    pub project_id: Option<i32>,
}

pub struct GradeService {
    pool: PgPool,
}

impl GradeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Graders see the grades they gave; admins see all of them
    pub async fn list(&self, caller: &AuthUser, filter: GradeFilter) -> Result<Vec<Grade>, ServiceError> {
        let sql = format!(
            "SELECT {GRADE_COLUMNS} FROM grades
             WHERE ($1 OR user_id = $2) AND ($3::INTEGER IS NULL OR project_id = $3)
             ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Grade>(&sql)
            .bind(caller.is_admin())
            .bind(caller.id)
            .bind(filter.project_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<Grade, ServiceError> {
        let sql = format!("SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1 AND ($2 OR user_id = $3)");
        sqlx::query_as::<_, Grade>(&sql)
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(grade_not_found)
    }

    /// Any authenticated user may grade any existing project
    pub async fn create(&self, caller: &AuthUser, input: GradeInput) -> Result<Grade, ServiceError> {
        check_value(input.value)?;

        let sql = format!(
            "INSERT INTO grades (value, comment, created_at, project_id, user_id)
             SELECT $1, $2, NOW(), p.id, $3 FROM projects p WHERE p.id = $4
             RETURNING {GRADE_COLUMNS}"
        );
        let grade = sqlx::query_as::<_, Grade>(&sql)
            .bind(input.value)
            .bind(comment_text(input.comment.as_deref()))
            .bind(caller.id)
            .bind(input.project_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

        tracing::info!("User {} graded project {} with {}", caller.id, grade.project_id, grade.value);
        Ok(grade)
    }

    pub async fn update(&self, caller: &AuthUser, id: i32, input: GradeUpdate) -> Result<(), ServiceError> {
        check_value(input.value)?;

        let result = sqlx::query(
            "UPDATE grades SET value = $1, comment = $2 WHERE id = $3 AND ($4 OR user_id = $5)",
        )
        .bind(input.value)
        .bind(comment_text(input.comment.as_deref()))
        .bind(id)
        .bind(caller.is_admin())
        .bind(caller.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(grade_not_found());
        }
        Ok(())
    }

    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1 AND ($2 OR user_id = $3)")
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(grade_not_found());
        }
        Ok(())
    }
}

fn grade_not_found() -> ServiceError {
    ServiceError::NotFound("Grade not found".to_string())
}

fn check_value(value: i32) -> Result<(), ServiceError> {
    if !is_valid_grade(value) {
        return Err(ServiceError::validation(
            "value",
            format!("must be between {} and {}", MIN_GRADE, MAX_GRADE),
        ));
    }
    Ok(())
}

fn comment_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}
