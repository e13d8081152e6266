//! Core Transport trait and types
//!
//! Requests carry a path relative to the API base (`/api/tasks/9`), an optional
//! JSON body and an optional `Authorization` header value. Responses carry the
//! status code and the raw body text.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Transport error types
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request could not be sent or no response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Outbound API request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,

    /// Path relative to the API base, starting with `/`
    pub path: String,

    /// JSON body
    pub body: Option<JsonValue>,

    /// Value of the `Authorization` header, if any
    pub authorization: Option<String>,
}

impl ApiRequest {
    /// Creates a request without body or credentials
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            body: None,
            authorization: None,
        }
    }

    /// Creates a GET request
    pub fn get(path: impl Into<String>) -> Self {
        ApiRequest::new(Method::Get, path)
    }

    /// Creates a POST request with a JSON body
    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        ApiRequest::new(Method::Post, path).with_body(body)
    }

    /// Creates a PUT request with a JSON body
    pub fn put(path: impl Into<String>, body: JsonValue) -> Self {
        ApiRequest::new(Method::Put, path).with_body(body)
    }

    /// Creates a DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        ApiRequest::new(Method::Delete, path)
    }

    /// Attaches a JSON body
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches `Authorization: Bearer <token>`
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.authorization = Some(format!("Bearer {}", token));
        self
    }

    /// Returns the bearer token carried by the request, if any
    pub fn bearer_token(&self) -> Option<&str> {
        self.authorization
            .as_deref()
            .and_then(|value| value.strip_prefix("Bearer "))
    }
}

/// Inbound API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw response body (may be empty)
    pub body: String,
}

impl ApiResponse {
    /// Creates a response with a raw body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    /// Creates a response with a JSON body
    pub fn json(status: u16, body: &impl Serialize) -> Self {
        // Serializing our own wire types cannot fail; fall back to an empty body
        ApiResponse::new(status, serde_json::to_string(body).unwrap_or_default())
    }

    /// Creates a response with no body
    pub fn empty(status: u16) -> Self {
        ApiResponse::new(status, String::new())
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Core Transport trait
///
/// Implementations must return `Ok` for every response the server produced,
/// whatever its status. `Err` is reserved for requests that got no response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the transport name
    ///
    /// Used for logging.
    fn name(&self) -> &str;

    /// Sends a request and waits for the response
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
