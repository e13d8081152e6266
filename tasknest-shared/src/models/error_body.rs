//! Error envelope returned by the API on non-2xx responses

use serde::{Deserialize, Serialize};

/// Error response format
///
/// Only `message` is interpreted by the client. Other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Creates an error body carrying a message
    pub fn with_message(message: impl Into<String>) -> Self {
        ErrorBody {
            message: Some(message.into()),
        }
    }

    /// Extracts the server message from a raw response body
    ///
    /// Returns `None` for empty, non-JSON, or message-less bodies, and for
    /// blank messages.
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json() {
        assert_eq!(
            ErrorBody::message_from(r#"{"message":"Title is required"}"#).as_deref(),
            Some("Title is required")
        );
    }

    #[test]
    fn test_message_from_unusable_bodies() {
        assert_eq!(ErrorBody::message_from(""), None);
        assert_eq!(ErrorBody::message_from("<html>502</html>"), None);
        assert_eq!(ErrorBody::message_from(r#"{"error":"x"}"#), None);
        assert_eq!(ErrorBody::message_from(r#"{"message":"  "}"#), None);
        assert_eq!(ErrorBody::message_from(r#"{"message":null}"#), None);
    }
}
