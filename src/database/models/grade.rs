use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MIN_GRADE: i32 = 0;
pub const MAX_GRADE: i32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub id: i32,
    pub value: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub project_id: i32,
    /// Grader
    pub user_id: i32,
}

pub fn is_valid_grade(value: i32) -> bool {
    (MIN_GRADE..=MAX_GRADE).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bounds_are_inclusive() {
        assert!(is_valid_grade(0));
        assert!(is_valid_grade(20));
        assert!(!is_valid_grade(-1));
        assert!(!is_valid_grade(21));
    }
}
