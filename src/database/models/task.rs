use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::comment::Comment;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub project_id: i32,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskWithComments {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_variant_names_on_the_wire() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), "InProgress");
        let parsed: TaskStatus = serde_json::from_str("\"Done\"").unwrap();
        assert_eq!(parsed, TaskStatus::Done);
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
    }

    #[test]
    fn task_with_comments_flattens_task_fields() {
        let detail = TaskWithComments {
            task: Task {
                id: 3,
                title: "Write report".to_string(),
                description: String::new(),
                status: TaskStatus::ToDo,
                project_id: 1,
                due_date: None,
            },
            comments: vec![],
        };
        let value = serde_json::to_value(detail).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["status"], "ToDo");
        assert!(value["comments"].as_array().unwrap().is_empty());
    }
}
