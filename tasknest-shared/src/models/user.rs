//! User model
//!
//! A user is identified by their email address. The server assigns the `id`,
//! which in practice coincides with the email. Users are immutable on the
//! client once received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned user ID
    pub id: String,

    /// Email address (the account identity)
    pub email: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user value, e.g. from a fixture or a mock server
    pub fn new(id: impl Into<String>, email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        User {
            id: id.into(),
            email: email.into(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_format() {
        let json = serde_json::json!({
            "id": "a@a.com",
            "email": "a@a.com",
            "createdAt": "2025-01-04T12:00:00Z"
        });

        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.email, "a@a.com");
        assert_eq!(user.id, "a@a.com");

        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("createdAt").is_some());
        assert!(back.get("created_at").is_none());
    }

    #[test]
    fn test_user_missing_email_is_rejected() {
        let json = serde_json::json!({
            "id": "x",
            "createdAt": "2025-01-04T12:00:00Z"
        });

        assert!(serde_json::from_value::<User>(json).is_err());
    }
}
