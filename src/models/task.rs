use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Completed,
}

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 100 characters.
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 500 characters if provided.
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// The status of the task. Defaults to `pending` when not provided.
    pub status: Option<TaskStatus>,

    /// The priority of the task. Defaults to `medium` when not provided.
    pub priority: Option<TaskPriority>,

    /// Optional due date for the task. Must lie in the future when set.
    #[validate(custom = "validate_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for an existing task. Absent fields are left unchanged;
/// present fields are validated with the same rules as on creation.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// New title for the task.
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: Option<String>,

    /// New description for the task.
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// New status for the task.
    pub status: Option<TaskStatus>,

    /// New priority for the task.
    pub priority: Option<TaskPriority>,

    /// New due date for the task. Must lie in the future when set.
    #[validate(custom = "validate_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// The current status of the task.
    pub status: TaskStatus,
    /// The priority of the task.
    pub priority: TaskPriority,
    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task. Fixed at creation.
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// Represents query parameters for filtering, sorting and paginating the
/// task list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// Filter tasks by status.
    pub status: Option<TaskStatus>,
    /// Filter tasks by priority.
    pub priority: Option<TaskPriority>,
    /// Field to sort by: `createdAt`, `updatedAt`, `dueDate`, `priority`,
    /// `status` or `title`. Defaults to `createdAt`.
    pub sort_by: Option<String>,
    /// Sort direction, `asc` or `desc`. Defaults to `desc`.
    pub sort_order: Option<String>,
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Page size. Defaults to 10.
    pub limit: Option<u32>,
}

/// Per-status task counts for the authenticated user.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct TaskStats {
    /// Total number of tasks.
    pub total: i64,
    /// Number of tasks with status `pending`.
    pub pending: i64,
    /// Number of tasks with status `in-progress`.
    #[serde(rename = "in-progress")]
    pub in_progress: i64,
    /// Number of tasks with status `completed`.
    pub completed: i64,
}

impl Task {
    /// Creates a new `Task` from `TaskInput` and the owner's id.
    /// Missing status and priority fall back to their defaults, and
    /// `created_at` and `updated_at` start out equal.
    pub fn new(input: TaskInput, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or(TaskStatus::Pending),
            priority: input.priority.unwrap_or(TaskPriority::Medium),
            due_date: input.due_date,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Rejects due dates that are not strictly in the future.
fn validate_due_date(due_date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *due_date <= Utc::now() {
        let mut error = ValidationError::new("due_date");
        error.message = Some("Due date must be in the future".into());
        return Err(error);
    }
    Ok(())
}
