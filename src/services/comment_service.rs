use serde::Deserialize;
use sqlx::PgPool;

use super::{required_text, ServiceError};
use crate::database::models::Comment;
use crate::middleware::AuthUser;

const COMMENT_COLUMNS: &str = "id, content, created_at, task_id, user_id";

#[derive(Debug, Clone, Deserialize)]
pub struct CommentInput {
    pub content: String,
    pub task_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentUpdate {
    pub content: String,
}

/// Body for `POST /api/tasks/:id/comments`
#[derive(Debug, Clone, Deserialize)]
pub struct NewTaskComment {
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentFilter {
    pub task_id: Option<i32>,
}

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, caller: &AuthUser, filter: CommentFilter) -> Result<Vec<Comment>, ServiceError> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE ($1 OR user_id = $2) AND ($3::INTEGER IS NULL OR task_id = $3)
             ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(caller.is_admin())
            .bind(caller.id)
            .bind(filter.task_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<Comment, ServiceError> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND ($2 OR user_id = $3)"
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(comment_not_found)
    }

    /// The task must belong to a project the caller can see
    pub async fn create(&self, caller: &AuthUser, input: CommentInput) -> Result<Comment, ServiceError> {
        let content = required_text("content", &input.content)?;

        let sql = format!(
            "INSERT INTO comments (content, created_at, task_id, user_id)
             SELECT $1, NOW(), t.id, $2 FROM tasks t JOIN projects p ON p.id = t.project_id
             WHERE t.id = $3 AND ($4 OR p.user_id = $2)
             RETURNING {COMMENT_COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(&content)
            .bind(caller.id)
            .bind(input.task_id)
            .bind(caller.is_admin())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found or access denied".to_string()))?;

        tracing::debug!("User {} commented on task {}", caller.id, comment.task_id);
        Ok(comment)
    }

    pub async fn update(&self, caller: &AuthUser, id: i32, input: CommentUpdate) -> Result<(), ServiceError> {
        let content = required_text("content", &input.content)?;

        let result = sqlx::query("UPDATE comments SET content = $1 WHERE id = $2 AND ($3 OR user_id = $4)")
            .bind(&content)
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found());
        }
        Ok(())
    }

    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND ($2 OR user_id = $3)")
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found());
        }
        Ok(())
    }
}

fn comment_not_found() -> ServiceError {
    ServiceError::NotFound("Comment not found".to_string())
}
