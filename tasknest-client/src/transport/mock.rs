//! Mock transport for testing and demos
//!
//! This transport emulates the TaskNest API in memory. It's useful for:
//! - Testing the client without a running server
//! - Demonstrating the login and task flows offline
//! - Reproducing failure paths (injected errors, held requests)
//!
//! # Emulated Endpoints
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | POST | `/api/auth/login` | 200 `{exists, user, token}` | 404 `{exists: false}` |
//! | POST | `/api/auth/register` | 201 `{user, token}` | 409 if the email exists |
//! | GET | `/api/tasks` | 200 `Task[]`, newest first | 401 without a valid token |
//! | POST | `/api/tasks` | 201 `Task` | 400 on invalid title/description |
//! | PUT | `/api/tasks/:id` | 200 `Task` | 404 for unknown ids |
//! | DELETE | `/api/tasks/:id` | 204 | 404 for unknown ids |
//!
//! # Failure Injection
//!
//! - [`MockTransport::respond_next`] replaces the next matching response
//! - [`MockTransport::fail_next`] is the same with a `{message}` error body
//! - [`MockTransport::hold`] parks every request (after recording it) until
//!   [`MockTransport::release`] is called
//!
//! # Example
//!
//! ```no_run
//! use tasknest_client::transport::{ApiRequest, Method, MockTransport, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = MockTransport::new();
//! let (_user, token) = transport.seed_user("a@a.com").await;
//!
//! transport.fail_next(Method::Get, 500, Some("Database down")).await;
//! let response = transport.send(ApiRequest::get("/api/tasks").with_bearer(&token)).await?;
//! assert_eq!(response.status, 500);
//! # Ok(())
//! # }
//! ```

use crate::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use tasknest_shared::models::{
    CreateTaskRequest, ErrorBody, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, Task, UpdateTaskRequest, User,
};
use tasknest_shared::models::task::{DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
use tokio::sync::{watch, Mutex};

/// A response queued to replace the next matching request's response
#[derive(Debug, Clone)]
struct Injected {
    /// Method to match (any method when `None`)
    method: Option<Method>,

    /// Response to return instead of the emulated one
    response: ApiResponse,
}

/// Emulated server state
#[derive(Debug, Default)]
struct MockState {
    /// Accounts by email
    users: HashMap<String, User>,

    /// Valid tokens mapped to the owning email
    tokens: HashMap<String, String>,

    /// All tasks, newest first
    tasks: Vec<Task>,

    /// Last assigned task ID
    last_task_id: u64,

    /// Every request received, in arrival order
    requests: Vec<ApiRequest>,

    /// Pending injected responses
    injected: VecDeque<Injected>,
}

/// Mock transport implementation
pub struct MockTransport {
    state: Mutex<MockState>,

    /// `true` while requests should be held
    gate: watch::Sender<bool>,
}

impl MockTransport {
    /// Creates an empty mock server
    pub fn new() -> Self {
        let (gate, _) = watch::channel(false);
        MockTransport {
            state: Mutex::new(MockState::default()),
            gate,
        }
    }

    /// Creates an account and returns it together with a valid token
    pub async fn seed_user(&self, email: &str) -> (User, String) {
        let mut state = self.state.lock().await;
        let user = state.create_user(email);
        let token = state.issue_token(email);
        (user, token)
    }

    /// Creates a task owned by `email` and returns it
    pub async fn seed_task(&self, email: &str, title: &str, completed: bool) -> Task {
        let mut state = self.state.lock().await;
        let mut task = state.create_task(
            email,
            CreateTaskRequest {
                title: title.to_string(),
                description: None,
            },
        );
        task.completed = completed;
        state.tasks[0].completed = completed;
        task
    }

    /// Invalidates a token, as if it had expired server-side
    pub async fn revoke_token(&self, token: &str) {
        self.state.lock().await.tokens.remove(token);
    }

    /// Returns the tasks the server holds for `email`, newest first
    pub async fn tasks_of(&self, email: &str) -> Vec<Task> {
        let state = self.state.lock().await;
        state
            .tasks
            .iter()
            .filter(|t| t.user_id == email)
            .cloned()
            .collect()
    }

    /// Returns true if an account exists for `email`
    pub async fn has_user(&self, email: &str) -> bool {
        self.state.lock().await.users.contains_key(email)
    }

    /// Returns every request received so far
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Counts received requests with the given method and path prefix
    pub async fn request_count(&self, method: Method, path_prefix: &str) -> usize {
        let state = self.state.lock().await;
        state
            .requests
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(path_prefix))
            .count()
    }

    /// Replaces the response of the next request with the given method
    pub async fn respond_next(&self, method: Option<Method>, response: ApiResponse) {
        self.state
            .lock()
            .await
            .injected
            .push_back(Injected { method, response });
    }

    /// Makes the next request with the given method fail with `status`
    pub async fn fail_next(&self, method: Method, status: u16, message: Option<&str>) {
        let body = match message {
            Some(msg) => ApiResponse::json(status, &ErrorBody::with_message(msg)),
            None => ApiResponse::empty(status),
        };
        self.respond_next(Some(method), body).await;
    }

    /// Holds every request until [`MockTransport::release`] is called
    pub fn hold(&self) {
        self.gate.send_replace(true);
    }

    /// Lets held requests proceed
    pub fn release(&self) {
        self.gate.send_replace(false);
    }

    async fn wait_for_gate(&self) {
        let mut rx = self.gate.subscribe();
        loop {
            let held = *rx.borrow_and_update();
            if !held || rx.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        tracing::debug!(method = %request.method, path = %request.path, "Mock transport received request");

        let injected = {
            let mut state = self.state.lock().await;
            state.requests.push(request.clone());
            state.take_injected(request.method)
        };

        self.wait_for_gate().await;

        if let Some(response) = injected {
            tracing::debug!(status = response.status, "Mock transport returning injected response");
            return Ok(response);
        }

        let mut state = self.state.lock().await;
        Ok(state.handle(&request))
    }
}

impl MockState {
    fn take_injected(&mut self, method: Method) -> Option<ApiResponse> {
        let index = self
            .injected
            .iter()
            .position(|i| i.method.map_or(true, |m| m == method))?;
        self.injected.remove(index).map(|i| i.response)
    }

    fn create_user(&mut self, email: &str) -> User {
        let user = User::new(email, email, Utc::now());
        self.users.insert(email.to_string(), user.clone());
        user
    }

    fn issue_token(&mut self, email: &str) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), email.to_string());
        token
    }

    fn create_task(&mut self, email: &str, data: CreateTaskRequest) -> Task {
        self.last_task_id += 1;
        let task = Task {
            id: self.last_task_id.to_string(),
            user_id: email.to_string(),
            title: data.title.trim().to_string(),
            description: data.description.unwrap_or_default().trim().to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        self.tasks.insert(0, task.clone());
        task
    }

    fn handle(&mut self, request: &ApiRequest) -> ApiResponse {
        let segments: Vec<&str> = request
            .path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match (request.method, segments.as_slice()) {
            (Method::Post, ["api", "auth", "login"]) => self.login(request.body.as_ref()),
            (Method::Post, ["api", "auth", "register"]) => self.register(request.body.as_ref()),
            (method, ["api", "tasks", rest @ ..]) => {
                let Some(email) = request
                    .bearer_token()
                    .and_then(|token| self.tokens.get(token))
                    .cloned()
                else {
                    return error(401, "Unauthorized");
                };

                match (method, rest) {
                    (Method::Get, []) => ApiResponse::json(200, &self.tasks_for(&email)),
                    (Method::Post, []) => self.create(&email, request.body.as_ref()),
                    (Method::Put, [id]) => self.update(&email, id, request.body.as_ref()),
                    (Method::Delete, [id]) => self.delete(&email, id),
                    _ => error(404, "Route not found"),
                }
            }
            _ => error(404, "Route not found"),
        }
    }

    fn login(&mut self, body: Option<&JsonValue>) -> ApiResponse {
        let Some(req) = parse_body::<LoginRequest>(body) else {
            return error(400, "Email is required");
        };

        if !self.users.contains_key(&req.email) {
            return ApiResponse::json(
                404,
                &serde_json::json!({ "exists": false, "message": "User not found" }),
            );
        }

        let user = self.users[&req.email].clone();
        let token = self.issue_token(&req.email);
        ApiResponse::json(200, &LoginResponse::found(user, token))
    }

    fn register(&mut self, body: Option<&JsonValue>) -> ApiResponse {
        let Some(req) = parse_body::<RegisterRequest>(body) else {
            return error(400, "Email is required");
        };

        if self.users.contains_key(&req.email) {
            return error(409, "User already exists");
        }

        let user = self.create_user(&req.email);
        let token = self.issue_token(&req.email);
        ApiResponse::json(201, &RegisterResponse { user, token })
    }

    fn tasks_for(&self, email: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.user_id == email)
            .cloned()
            .collect()
    }

    fn create(&mut self, email: &str, body: Option<&JsonValue>) -> ApiResponse {
        let Some(req) = parse_body::<CreateTaskRequest>(body) else {
            return error(400, "Title is required");
        };

        if let Some(msg) = check_fields(Some(&req.title), req.description.as_deref()) {
            return error(400, msg);
        }

        let task = self.create_task(email, req);
        ApiResponse::json(201, &task)
    }

    fn update(&mut self, email: &str, id: &str, body: Option<&JsonValue>) -> ApiResponse {
        let Some(req) = parse_body::<UpdateTaskRequest>(body) else {
            return error(400, "Invalid update");
        };

        if let Some(msg) = check_fields(req.title.as_deref(), req.description.as_deref()) {
            return error(400, msg);
        }

        let Some(task) = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == email)
        else {
            return error(404, "Task not found");
        };

        if let Some(title) = req.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = req.description {
            task.description = description.trim().to_string();
        }
        if let Some(completed) = req.completed {
            task.completed = completed;
        }

        ApiResponse::json(200, &*task)
    }

    fn delete(&mut self, email: &str, id: &str) -> ApiResponse {
        let before = self.tasks.len();
        self.tasks.retain(|t| !(t.id == id && t.user_id == email));

        if self.tasks.len() == before {
            return error(404, "Task not found");
        }

        ApiResponse::empty(204)
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Option<&JsonValue>) -> Option<T> {
    body.and_then(|b| serde_json::from_value(b.clone()).ok())
}

fn check_fields(title: Option<&str>, description: Option<&str>) -> Option<&'static str> {
    if let Some(title) = title {
        let len = title.trim().chars().count() as u64;
        if len == 0 || len > TITLE_MAX_LEN {
            return Some("Title must be between 1 and 100 characters");
        }
    }

    if let Some(description) = description {
        if description.trim().chars().count() as u64 > DESCRIPTION_MAX_LEN {
            return Some("Description must be at most 500 characters");
        }
    }

    None
}

fn error(status: u16, message: &str) -> ApiResponse {
    ApiResponse::json(status, &ErrorBody::with_message(message))
}
