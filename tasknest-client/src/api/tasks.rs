//! Task endpoints
//!
//! All calls are protected. See [`AuthInterceptor`](super::AuthInterceptor)
//! for what happens when the credential is rejected.

use crate::api::client::{encode, ApiClient};
use crate::error::ApiResult;
use crate::transport::ApiRequest;
use std::sync::Arc;
use tasknest_shared::models::{CreateTaskRequest, Task, UpdateTaskRequest};

/// Collection path
pub const TASKS_PATH: &str = "/api/tasks";

/// Client for `/api/tasks`
#[derive(Clone)]
pub struct TaskApi {
    client: Arc<ApiClient>,
}

impl TaskApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        TaskApi { client }
    }

    /// Lists the user's tasks in server order
    pub async fn list(&self) -> ApiResult<Vec<Task>> {
        self.client.fetch(ApiRequest::get(TASKS_PATH)).await
    }

    /// Creates a task
    pub async fn create(&self, data: &CreateTaskRequest) -> ApiResult<Task> {
        let body = encode(data)?;
        self.client.fetch(ApiRequest::post(TASKS_PATH, body)).await
    }

    /// Applies a partial update
    pub async fn update(&self, id: &str, data: &UpdateTaskRequest) -> ApiResult<Task> {
        let body = encode(data)?;
        self.client
            .fetch(ApiRequest::put(task_path(id), body))
            .await
    }

    /// Flips `completed`
    pub async fn toggle_completed(&self, task: &Task) -> ApiResult<Task> {
        self.update(&task.id, &UpdateTaskRequest::toggle(task)).await
    }

    /// Deletes a task
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .send_protected(ApiRequest::delete(task_path(id)))
            .await?;
        Ok(())
    }
}

/// Item path, with the id encoded as a single segment
fn task_path(id: &str) -> String {
    format!("{}/{}", TASKS_PATH, urlencoding::encode(id))
}
