use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;

use super::{optional_text, required_text, ServiceError};
use crate::database::models::{Grade, Project, ProjectWithTasks, Task};
use crate::middleware::AuthUser;

const PROJECT_COLUMNS: &str = "id, name, description, user_id, creation_date";

/// Body for both create and update
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
}

pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<ProjectWithTasks>, ServiceError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE ($1 OR user_id = $2) ORDER BY id"
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(caller.is_admin())
            .bind(caller.id)
            .fetch_all(&self.pool)
            .await?;

        self.attach_tasks(projects).await
    }

    pub async fn get(&self, caller: &AuthUser, id: i32) -> Result<ProjectWithTasks, ServiceError> {
        let project = self.find_visible(caller, id).await?;
        let mut detailed = self.attach_tasks(vec![project]).await?;
        detailed.pop().ok_or_else(project_not_found)
    }

    pub async fn create(&self, caller: &AuthUser, input: ProjectInput) -> Result<Project, ServiceError> {
        let name = required_text("name", &input.name)?;

        let sql = format!(
            "INSERT INTO projects (name, description, user_id, creation_date)
             VALUES ($1, $2, $3, NOW())
             RETURNING {PROJECT_COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(&name)
            .bind(optional_text(input.description.as_deref()))
            .bind(caller.id)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("User {} created project {}", caller.id, project.id);
        Ok(project)
    }

    pub async fn update(&self, caller: &AuthUser, id: i32, input: ProjectInput) -> Result<(), ServiceError> {
        let name = required_text("name", &input.name)?;

        let result = sqlx::query(
            "UPDATE projects SET name = $1, description = $2
             WHERE id = $3 AND ($4 OR user_id = $5)",
        )
        .bind(&name)
        .bind(optional_text(input.description.as_deref()))
        .bind(id)
        .bind(caller.is_admin())
        .bind(caller.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(project_not_found());
        }
        Ok(())
    }

    /// Tasks, their comments and the project's grades go with it
    pub async fn delete(&self, caller: &AuthUser, id: i32) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND ($2 OR user_id = $3)")
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(project_not_found());
        }
        tracing::info!("User {} deleted project {}", caller.id, id);
        Ok(())
    }

    /// Grades received by a project, readable by its owner
    pub async fn grades(&self, caller: &AuthUser, id: i32) -> Result<Vec<Grade>, ServiceError> {
        self.find_visible(caller, id).await?;

        Ok(sqlx::query_as::<_, Grade>(
            "SELECT id, value, comment, created_at, project_id, user_id
             FROM grades WHERE project_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub(crate) async fn find_visible(&self, caller: &AuthUser, id: i32) -> Result<Project, ServiceError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND ($2 OR user_id = $3)"
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(caller.is_admin())
            .bind(caller.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(project_not_found)
    }

    /// One query for all tasks of the given projects, grouped in memory
    async fn attach_tasks(&self, projects: Vec<Project>) -> Result<Vec<ProjectWithTasks>, ServiceError> {
        let ids: Vec<i32> = projects.iter().map(|p| p.id).collect();

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, title, description, status, project_id, due_date
             FROM tasks WHERE project_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_project: HashMap<i32, Vec<Task>> = HashMap::new();
        for task in tasks {
            by_project.entry(task.project_id).or_default().push(task);
        }

        Ok(projects
            .into_iter()
            .map(|project| {
                let tasks = by_project.remove(&project.id).unwrap_or_default();
                ProjectWithTasks { project, tasks }
            })
            .collect())
    }
}

fn project_not_found() -> ServiceError {
    ServiceError::NotFound("Project not found".to_string())
}
