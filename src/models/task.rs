use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Completed,
}

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: TaskPriority,
}

/// Partial update of a task. Fields left out keep their current value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The account that owns the task.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_limit() -> i64 {
    100
}

/// Query parameters for listing tasks.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskQuery {
    /// Number of tasks to skip.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    /// Page size, 1 to 100.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    /// Only return tasks in this status.
    pub status: Option<TaskStatus>,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            status: None,
        }
    }
}

/// Pagination metadata returned alongside a task listing.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

/// One page of tasks.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
}

impl TaskPage {
    pub fn new(tasks: Vec<Task>, total: i64, query: &TaskQuery) -> Self {
        let has_more = query.skip + (tasks.len() as i64) < total;
        Self {
            tasks,
            pagination: Pagination {
                total,
                limit: query.limit,
                offset: query.skip,
                has_more,
            },
        }
    }
}

impl Task {
    /// Creates a new, not yet completed task owned by `user_id`.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        self.updated_at = Utc::now();
    }

    pub fn toggle_completion(&mut self) {
        self.completed = !self.completed;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("Test Description".to_string()),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
        }
    }

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(input("Test Task"), owner);

        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, owner);
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut long_description = input("Valid title");
        long_description.description = Some("b".repeat(1001));
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_input_defaults() {
        let input: TaskInput = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert_eq!(input.status, TaskStatus::Pending);
        assert_eq!(input.priority, TaskPriority::Medium);
        assert!(input.description.is_none());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "in_progress"
        );
        assert_eq!(serde_json::to_value(TaskPriority::Low).unwrap(), "low");
        assert!(serde_json::from_str::<TaskStatus>(r#""done""#).is_err());
    }

    #[test]
    fn test_partial_update_keeps_missing_fields() {
        let mut task = Task::new(input("Original"), Uuid::new_v4());
        task.apply(TaskUpdate {
            status: Some(TaskStatus::InProgress),
            ..TaskUpdate::default()
        });

        assert_eq!(task.title, "Original");
        assert_eq!(task.description.as_deref(), Some("Test Description"));
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_update_validation() {
        let empty_title = TaskUpdate {
            title: Some(String::new()),
            ..TaskUpdate::default()
        };
        assert!(empty_title.validate().is_err());
        assert!(TaskUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_toggle_completion() {
        let mut task = Task::new(input("Toggle me"), Uuid::new_v4());
        task.toggle_completion();
        assert!(task.completed);
        task.toggle_completion();
        assert!(!task.completed);
    }

    #[test]
    fn test_query_defaults_and_bounds() {
        let query: TaskQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, 100);
        assert!(query.validate().is_ok());

        let too_large = TaskQuery {
            limit: 101,
            ..TaskQuery::default()
        };
        assert!(too_large.validate().is_err());

        let negative_skip = TaskQuery {
            skip: -1,
            ..TaskQuery::default()
        };
        assert!(negative_skip.validate().is_err());
    }

    #[test]
    fn test_page_has_more() {
        let query = TaskQuery {
            skip: 0,
            limit: 2,
            status: None,
        };
        let owner = Uuid::new_v4();
        let tasks = vec![Task::new(input("a"), owner), Task::new(input("b"), owner)];

        let page = TaskPage::new(tasks, 3, &query);
        assert!(page.pagination.has_more);
        assert_eq!(page.pagination.offset, 0);

        let last = TaskPage::new(Vec::new(), 3, &TaskQuery { skip: 3, ..query });
        assert!(!last.pagination.has_more);
    }
}
