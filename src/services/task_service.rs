use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use super::comment_service::{CommentInput, CommentService};
use super::{required_text, ServiceError};
use crate::database::models::{Comment, Task, TaskStatus, TaskWithComments};
use crate::middleware::AuthUser;

/// Days until a task falls due when the caller gives no date
pub const DEFAULT_DUE_DAYS: i64 = 7;

/// Due dates must fall within four-digit years
const DUE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.project_id, t.due_date";

#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub project_id: i32,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskUpdate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub project_id: Option<i32>,
    pub status: Option<TaskStatus>,
}

pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, caller: &AuthUser, filter: TaskFilter) -> Result<Vec<TaskWithComments>, ServiceError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t JOIN projects p ON p.id = t.project_id
             WHERE ($1 OR p.user_id = $2)
               AND ($3::INTEGER IS NULL OR t.project_id = $3)
               AND ($4::task_status IS NULL OR t.status = $4)
             ORDER BY t.id"
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(caller.is_admin())
            .bind(caller.id)
            .bind(filter.project_id)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        self.attach_comments(tasks).await
    }

    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<TaskWithComments, ServiceError> {
        let task = self.find_visible(caller, id).await?;
        let mut detailed = self.attach_comments(vec![task]).await?;
        detailed.pop().ok_or_else(task_not_found)
    }

    pub async fn create(&self, caller: &AuthUser, input: TaskInput) -> Result<Task, ServiceError> {
        let title = required_text("title", &input.title)?;
        check_due_date(input.due_date.as_ref())?;
        let due_date = input
            .due_date
            .unwrap_or_else(|| Utc::now() + Duration::days(DEFAULT_DUE_DAYS));

        // Insert only into a project the caller can see
        let sql = "INSERT INTO tasks (title, description, status, project_id, due_date)
             SELECT $1, $2, $3, p.id, $4 FROM projects p
             WHERE p.id = $5 AND ($6 OR p.user_id = $7)
             RETURNING id, title, description, status, project_id, due_date";
        let task = sqlx::query_as::<_, Task>(sql)
            .bind(&title)
            .bind(description_text(input.description.as_deref()))
            .bind(input.status)
            .bind(due_date)
            .bind(input.project_id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found or access denied".to_string()))?;

        tracing::info!("User {} created task {} in project {}", caller.id, task.id, task.project_id);
        Ok(task)
    }

    pub async fn update(&self, caller: &AuthUser, id: i32, input: TaskUpdate) -> Result<(), ServiceError> {
        let title = required_text("title", &input.title)?;
        check_due_date(input.due_date.as_ref())?;

        let result = sqlx::query(
            "UPDATE tasks t SET title = $1, description = $2, status = $3, due_date = $4
             FROM projects p
             WHERE t.id = $5 AND p.id = t.project_id AND ($6 OR p.user_id = $7)",
        )
        .bind(&title)
        .bind(description_text(input.description.as_deref()))
        .bind(input.status)
        .bind(input.due_date)
        .bind(id)
        .bind(caller.is_admin())
        .bind(caller.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }
        Ok(())
    }

    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "DELETE FROM tasks t USING projects p
             WHERE t.id = $1 AND p.id = t.project_id AND ($2 OR p.user_id = $3)",
        )
        .bind(id)
        .bind(caller.is_admin())
        .bind(caller.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }
        tracing::info!("User {} deleted task {}", caller.id, id);
        Ok(())
    }

    /// Comment on a task through its own route; the path id wins over any body task_id
    pub async fn add_comment(&self, caller: &AuthUser, id: i32, content: &str) -> Result<Comment, ServiceError> {
        CommentService::new(self.pool.clone())
            .create(
                caller,
                CommentInput {
                    content: content.to_string(),
                    task_id: id,
                },
            )
            .await
    }

    pub(crate) async fn find_visible(&self, caller: &AuthUser, id: i32) -> Result<Task, ServiceError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t JOIN projects p ON p.id = t.project_id
             WHERE t.id = $1 AND ($2 OR p.user_id = $3)"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(task_not_found)
    }

    async fn attach_comments(&self, tasks: Vec<Task>) -> Result<Vec<TaskWithComments>, ServiceError> {
        let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();

        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, content, created_at, task_id, user_id
             FROM comments WHERE task_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_task: HashMap<i32, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_task.entry(comment.task_id).or_default().push(comment);
        }

        Ok(tasks
            .into_iter()
            .map(|task| {
                let comments = by_task.remove(&task.id).unwrap_or_default();
                TaskWithComments { task, comments }
            })
            .collect())
    }
}

fn task_not_found() -> ServiceError {
    ServiceError::NotFound("Task not found".to_string())
}

fn check_due_date(due_date: Option<&DateTime<Utc>>) -> Result<(), ServiceError> {
    match due_date {
        Some(date) if !DUE_YEARS.contains(&date.year()) => {
            Err(ServiceError::validation("due_date", "must be between years 1 and 9999"))
        }
        _ => Ok(()),
    }
}

fn description_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}
