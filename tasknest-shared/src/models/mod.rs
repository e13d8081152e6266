//! Data model and wire contract for TaskNest
//!
//! All types serialize to the JSON shapes the TaskNest API speaks
//! (`camelCase` field names).
//!
//! # Models
//!
//! - `user`: The authenticated account
//! - `task`: Tasks plus create/update payloads and the task form
//! - `auth`: Login/register request and response bodies
//! - `error_body`: The error envelope returned on non-2xx responses
//!
//! # Example
//!
//! ```
//! use tasknest_shared::models::task::{Task, UpdateTaskRequest};
//!
//! # fn example(task: &Task) {
//! let flip = UpdateTaskRequest::toggle(task);
//! assert_eq!(flip.completed, Some(!task.completed));
//! # }
//! ```

pub mod auth;
pub mod error_body;
pub mod task;
pub mod user;

pub use auth::{LoginForm, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use error_body::ErrorBody;
pub use task::{CreateTaskRequest, Task, TaskForm, UpdateTaskRequest};
pub use user::User;
