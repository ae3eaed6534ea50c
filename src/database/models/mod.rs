pub mod comment;
pub mod grade;
pub mod project;
pub mod task;
pub mod user;

pub use comment::Comment;
pub use grade::Grade;
pub use project::{Project, ProjectWithTasks};
pub use task::{Task, TaskStatus, TaskWithComments};
pub use user::{User, UserRole};
