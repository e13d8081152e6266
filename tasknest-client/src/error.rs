//! Error handling for the TaskNest client
//!
//! Every operation that talks to the API returns `ApiResult<T>`. The variants
//! follow how the UI has to react to a failure:
//!
//! - `Validation`: rejected locally, no request was sent
//! - `NotFound`: 404, drives the create-account confirmation on login
//! - `Unauthorized`: 401/403, the session has already been torn down
//! - `Status`: any other non-2xx response
//! - `Transport`: the request never produced a response
//! - `Decode`: a 2xx response whose body does not match the wire contract
//!
//! # Example
//!
//! ```
//! use tasknest_client::error::ApiError;
//!
//! let err = ApiError::from_status(500, Some("Database down".to_string()));
//! assert_eq!(err.status(), Some(500));
//! assert_eq!(err.message_or("Something went wrong"), "Database down");
//! ```

use crate::transport::TransportError;

/// Client result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified client error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input rejected before reaching the network
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Not found (404)
    #[error("Not found{}", fmt_message(.message))]
    NotFound { message: Option<String> },

    /// Unauthorized (401) or forbidden (403)
    #[error("Unauthorized ({status}){}", fmt_message(.message))]
    Unauthorized { status: u16, message: Option<String> },

    /// Any other non-2xx response
    #[error("Server returned {status}{}", fmt_message(.message))]
    Status { status: u16, message: Option<String> },

    /// Network failure, no response received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed success response
    #[error("Malformed response: {0}")]
    Decode(String),
}

fn fmt_message(message: &Option<String>) -> String {
    match message {
        Some(msg) => format!(": {}", msg),
        None => String::new(),
    }
}

impl ApiError {
    /// Builds the error for a non-2xx status
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized { status, message },
            404 => ApiError::NotFound { message },
            _ => ApiError::Status { status, message },
        }
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message, or `fallback` when the server did not supply one
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// True for the "account/resource does not exist" case
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// True for 401/403
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(tasknest_shared::validation::summary(&errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::from_status(404, None);
        assert_eq!(err.to_string(), "Not found");

        let err = ApiError::from_status(500, Some("boom".to_string()));
        assert_eq!(err.to_string(), "Server returned 500: boom");

        let err = ApiError::Validation("Invalid email format".to_string());
        assert_eq!(err.to_string(), "Validation failed: Invalid email format");
    }

    #[test]
    fn test_from_status_classification() {
        assert!(ApiError::from_status(401, None).is_unauthorized());
        assert!(ApiError::from_status(403, None).is_unauthorized());
        assert!(ApiError::from_status(404, None).is_not_found());
        assert!(matches!(
            ApiError::from_status(409, None),
            ApiError::Status { status: 409, .. }
        ));
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(ApiError::from_status(403, None).status(), Some(403));
        assert_eq!(ApiError::from_status(404, None).status(), Some(404));
        assert_eq!(ApiError::Transport("down".to_string()).status(), None);
        assert_eq!(ApiError::Decode("bad".to_string()).status(), None);
    }

    #[test]
    fn test_message_or_prefers_server_message() {
        let err = ApiError::from_status(422, Some("Title too long".to_string()));
        assert_eq!(err.message_or("fallback"), "Title too long");

        let err = ApiError::from_status(422, None);
        assert_eq!(err.message_or("fallback"), "fallback");

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.message_or("fallback"), "fallback");
    }
}
