//! Task model and request payloads
//!
//! Tasks are owned by a user and identified by a server-assigned `id`.
//! Only `title`, `description` and `completed` ever change, and only after the
//! server confirms the change.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "id": "9",
//!   "userId": "a@a.com",
//!   "title": "Buy milk",
//!   "description": "",
//!   "completed": false,
//!   "createdAt": "2025-01-04T12:00:00Z"
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use tasknest_shared::models::task::TaskForm;
//! use validator::Validate;
//!
//! let form = TaskForm::new("  Buy milk ", "");
//! assert!(form.validate().is_ok());
//! assert_eq!(form.title, "Buy milk");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum title length in characters
pub const TITLE_MAX_LEN: u64 = 100;

/// Maximum description length in characters
pub const DESCRIPTION_MAX_LEN: u64 = 500;

/// A task belonging to the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned task ID, never changes
    pub id: String,

    /// Owner of the task
    pub user_id: String,

    /// Title (1..=100 chars)
    pub title: String,

    /// Description (0..=500 chars)
    #[serde(default)]
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns true if the task is not completed yet
    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

/// Body of `POST /api/tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title
    pub title: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /api/tasks/:id`
///
/// All fields are optional. Only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Builds the payload that flips a task's completion flag
    pub fn toggle(task: &Task) -> Self {
        UpdateTaskRequest {
            completed: Some(!task.completed),
            ..Default::default()
        }
    }
}

/// Task create/edit form contents
///
/// Values are trimmed on construction; validation applies to the trimmed text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TaskForm {
    /// Title
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,

    /// Description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

impl TaskForm {
    /// Creates a trimmed form
    pub fn new(title: impl AsRef<str>, description: impl AsRef<str>) -> Self {
        TaskForm {
            title: title.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
        }
    }

    /// Creates a form with only a title
    pub fn titled(title: impl AsRef<str>) -> Self {
        TaskForm::new(title, "")
    }

    /// Converts the form into a create payload
    ///
    /// The description is always sent, empty or not.
    pub fn to_create_request(&self) -> CreateTaskRequest {
        CreateTaskRequest {
            title: self.title.clone(),
            description: Some(self.description.clone()),
        }
    }

    /// Converts the form into an update payload for title and description
    pub fn to_update_request(&self) -> UpdateTaskRequest {
        UpdateTaskRequest {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            completed: None,
        }
    }
}

impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        TaskForm::new(&task.title, &task.description)
    }
}
