//! Task list controller
//!
//! Owns the signed-in user's tasks as last confirmed by the server, the edit
//! intent, and the flags the presentation layer renders (`loading`, `saving`,
//! `error_message`).
//!
//! # Consistency
//!
//! Mutations are confirm-then-apply: the local list only changes after the
//! server answered with success, and only the entry whose id matches the
//! server's task is touched. Replacing or removing an id that is no longer in
//! the list is a no-op, so late responses are harmless.
//!
//! # Save Cycle
//!
//! Create, update and delete share the `saving` flag. While it is set, a new
//! submit or delete is refused without reaching the network. Toggles do not
//! take part in the save cycle and can run alongside anything.

use crate::api::TaskApi;
use crate::error::{ApiError, ApiResult};
use crate::ui::Notifier;
use std::sync::Arc;
use tasknest_shared::models::{Task, TaskForm};
use tokio::sync::watch;
use validator::Validate;

pub const TASK_CREATED_MESSAGE: &str = "Task created successfully";
pub const TASK_UPDATED_MESSAGE: &str = "Task updated successfully";
pub const TASK_DELETED_MESSAGE: &str = "Task deleted successfully";
pub const CREATE_FAILED_MESSAGE: &str = "Could not create the task. Please try again.";
pub const UPDATE_FAILED_MESSAGE: &str = "Could not update the task. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Could not delete the task. Please try again.";
pub const TOGGLE_FAILED_MESSAGE: &str = "Could not update the task status.";
pub const LOAD_FAILED_MESSAGE: &str =
    "An error occurred while loading your tasks. Please try again later.";

/// Observable task list state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    /// Tasks in display order
    pub tasks: Vec<Task>,

    /// A load is in flight
    pub loading: bool,

    /// A create, update or delete is in flight
    pub saving: bool,

    /// Task being edited, if any
    pub editing: Option<Task>,

    /// Inline error of the last failed submit
    pub error_message: Option<String>,

    /// Bumped after every successful submit; the form resets when it changes
    pub reset_signal: u64,
}

impl TaskListState {
    /// Number of tasks not yet completed
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_pending()).count()
    }

    /// Number of completed tasks
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

/// Task list controller
pub struct TaskListController {
    api: TaskApi,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<TaskListState>,
}

impl TaskListController {
    pub fn new(api: TaskApi, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(TaskListState::default());
        TaskListController {
            api,
            notifier,
            state,
        }
    }

    /// Replaces the list with the server's
    ///
    /// On failure the list is left as it was.
    pub async fn load_tasks(&self) -> ApiResult<()> {
        self.state.send_modify(|s| s.loading = true);

        match self.api.list().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "Loaded tasks");
                self.state.send_modify(|s| {
                    s.tasks = tasks;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load tasks");
                self.state.send_modify(|s| s.loading = false);
                self.report(&e, LOAD_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    /// Creates a task, or updates the one being edited
    ///
    /// Returns `Ok(None)` without sending anything when a save is already in
    /// flight.
    ///
    /// # Errors
    ///
    /// - `ApiError::Validation` if the form is invalid (nothing changes)
    /// - The API error otherwise, after it was shown to the user
    pub async fn submit_task(&self, form: TaskForm) -> ApiResult<Option<Task>> {
        let form = TaskForm::new(&form.title, &form.description);
        form.validate()?;

        let mut editing = None;
        let started = self.state.send_if_modified(|s| {
            if s.saving {
                return false;
            }
            s.saving = true;
            s.error_message = None;
            editing = s.editing.clone();
            true
        });

        if !started {
            tracing::debug!("Submit ignored, a save is already in flight");
            return Ok(None);
        }

        match editing {
            Some(task) => self.update(&task, &form).await.map(Some),
            None => self.create(&form).await.map(Some),
        }
    }

    async fn create(&self, form: &TaskForm) -> ApiResult<Task> {
        match self.api.create(&form.to_create_request()).await {
            Ok(created) => {
                tracing::info!(task_id = %created.id, "Task created");
                self.state.send_modify(|s| {
                    s.tasks.insert(0, created.clone());
                    s.saving = false;
                    s.reset_signal = s.reset_signal.wrapping_add(1);
                });
                self.notifier.success(TASK_CREATED_MESSAGE);
                Ok(created)
            }
            Err(e) => Err(self.save_failed(e, CREATE_FAILED_MESSAGE)),
        }
    }

    async fn update(&self, task: &Task, form: &TaskForm) -> ApiResult<Task> {
        match self.api.update(&task.id, &form.to_update_request()).await {
            Ok(updated) => {
                tracing::info!(task_id = %updated.id, "Task updated");
                self.state.send_modify(|s| {
                    replace_by_id(&mut s.tasks, &updated);
                    s.editing = None;
                    s.saving = false;
                    s.reset_signal = s.reset_signal.wrapping_add(1);
                });
                self.notifier.success(TASK_UPDATED_MESSAGE);
                Ok(updated)
            }
            Err(e) => Err(self.save_failed(e, UPDATE_FAILED_MESSAGE)),
        }
    }

    fn save_failed(&self, error: ApiError, fallback: &str) -> ApiError {
        tracing::warn!(error = %error, "Failed to save task");
        let message = error.message_or(fallback);
        self.state.send_modify(|s| {
            s.saving = false;
            s.error_message = Some(message.clone());
        });
        self.report(&error, &message);
        error
    }

    /// Shows a failure notification
    ///
    /// Rejected credentials were already announced when the session was torn
    /// down, so they are not notified a second time.
    fn report(&self, error: &ApiError, message: &str) {
        if !error.is_unauthorized() {
            self.notifier.error(message);
        }
    }

    /// Flips `completed` on the server and applies the result
    pub async fn toggle_completed(&self, task: &Task) -> ApiResult<Task> {
        match self.api.toggle_completed(task).await {
            Ok(updated) => {
                tracing::debug!(task_id = %updated.id, completed = updated.completed, "Task toggled");
                self.state.send_modify(|s| {
                    replace_by_id(&mut s.tasks, &updated);
                });
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "Failed to toggle task");
                self.report(&e, TOGGLE_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    /// Deletes a task
    ///
    /// Returns `Ok(false)` without sending anything when a save is already in
    /// flight.
    pub async fn delete_task(&self, task: &Task) -> ApiResult<bool> {
        let started = self.state.send_if_modified(|s| {
            if s.saving {
                return false;
            }
            s.saving = true;
            true
        });

        if !started {
            tracing::debug!(task_id = %task.id, "Delete ignored, a save is already in flight");
            return Ok(false);
        }

        match self.api.delete(&task.id).await {
            Ok(()) => {
                tracing::info!(task_id = %task.id, "Task deleted");
                self.state.send_modify(|s| {
                    remove_by_id(&mut s.tasks, &task.id);
                    s.saving = false;
                });
                self.notifier.success(TASK_DELETED_MESSAGE);
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "Failed to delete task");
                self.state.send_modify(|s| s.saving = false);
                self.report(&e, &e.message_or(DELETE_FAILED_MESSAGE));
                Err(e)
            }
        }
    }

    /// Starts editing `task`
    pub fn begin_edit(&self, task: Task) {
        self.state.send_modify(|s| s.editing = Some(task));
    }

    /// Stops editing and clears the inline error
    pub fn cancel_edit(&self) {
        self.state.send_modify(|s| {
            s.editing = None;
            s.error_message = None;
        });
    }

    /// Snapshot of the whole state
    pub fn snapshot(&self) -> TaskListState {
        self.state.borrow().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_saving(&self) -> bool {
        self.state.borrow().saving
    }

    pub fn editing(&self) -> Option<Task> {
        self.state.borrow().editing.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.state.borrow().error_message.clone()
    }

    pub fn reset_signal(&self) -> u64 {
        self.state.borrow().reset_signal
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending_count()
    }

    pub fn completed_count(&self) -> usize {
        self.state.borrow().completed_count()
    }

    /// Subscribes to state changes
    pub fn subscribe(&self) -> watch::Receiver<TaskListState> {
        self.state.subscribe()
    }
}

/// Replaces the task with the same id in place
fn replace_by_id(tasks: &mut [Task], updated: &Task) -> bool {
    match tasks.iter_mut().find(|t| t.id == updated.id) {
        Some(slot) => {
            *slot = updated.clone();
            true
        }
        None => false,
    }
}

/// Removes the task with `id`
fn remove_by_id(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    tasks.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            user_id: "a@a.com".to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            completed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_replace_by_id_keeps_order() {
        let mut tasks = vec![task("3", false), task("2", false), task("1", false)];
        let mut updated = task("2", true);
        updated.title = "Renamed".to_string();

        assert!(replace_by_id(&mut tasks, &updated));
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["3", "2", "1"]);
        assert_eq!(tasks[1].title, "Renamed");
        assert!(tasks[1].completed);
    }

    #[test]
    fn test_replace_missing_id_is_noop() {
        let before = vec![task("1", false)];
        let mut tasks = before.clone();
        assert!(!replace_by_id(&mut tasks, &task("7", true)));
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_remove_by_id() {
        let mut tasks = vec![task("3", false), task("2", false), task("1", false)];
        assert!(remove_by_id(&mut tasks, "2"));
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);

        assert!(!remove_by_id(&mut tasks, "2"));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_counts_cover_every_task() {
        let state = TaskListState {
            tasks: vec![task("3", true), task("2", false), task("1", false)],
            ..Default::default()
        };
        assert_eq!(state.pending_count(), 2);
        assert_eq!(state.completed_count(), 1);
        assert_eq!(state.pending_count() + state.completed_count(), state.tasks.len());
    }
}
