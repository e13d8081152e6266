//! Authentication request and response bodies
//!
//! # Endpoints
//!
//! - `POST /api/auth/login` with `{email}` returns `{exists, user?, token?}`,
//!   or 404 when no account exists for the email
//! - `POST /api/auth/register` with `{email}` returns `{user, token}`

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::User;

/// Login form contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

impl LoginForm {
    /// Creates a trimmed login form
    pub fn new(email: impl AsRef<str>) -> Self {
        LoginForm {
            email: email.as_ref().trim().to_string(),
        }
    }
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
}

/// Response of `POST /api/auth/login`
///
/// `exists` is required: a body without it is malformed rather than
/// "account not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Whether an account exists for the email
    pub exists: bool,

    /// The account (present when `exists` is true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// Bearer token (present when `exists` is true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Builds the response for an existing account
    pub fn found(user: User, token: impl Into<String>) -> Self {
        LoginResponse {
            exists: true,
            user: Some(user),
            token: Some(token.into()),
        }
    }

    /// Builds the response for an unknown email
    pub fn missing() -> Self {
        LoginResponse {
            exists: false,
            user: None,
            token: None,
        }
    }
}

/// Body of `POST /api/auth/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address
    pub email: String,
}

/// Response of `POST /api/auth/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The new account
    pub user: User,

    /// Bearer token for the new account
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_validation() {
        assert!(LoginForm::new("a@a.com").validate().is_ok());
        assert!(LoginForm::new("  a@a.com ").validate().is_ok());
        assert!(LoginForm::new("not-an-email").validate().is_err());
        assert!(LoginForm::new("").validate().is_err());
    }

    #[test]
    fn test_login_response_requires_exists() {
        let json = serde_json::json!({ "token": "t1" });
        assert!(serde_json::from_value::<LoginResponse>(json).is_err());
    }

    #[test]
    fn test_login_response_missing_account() {
        let json = serde_json::json!({ "exists": false });
        let resp: LoginResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp, LoginResponse::missing());
    }

    #[test]
    fn test_login_response_existing_account() {
        let json = serde_json::json!({
            "exists": true,
            "user": {
                "id": "a@a.com",
                "email": "a@a.com",
                "createdAt": "2025-01-04T12:00:00Z"
            },
            "token": "t1"
        });

        let resp: LoginResponse = serde_json::from_value(json).unwrap();
        assert!(resp.exists);
        assert_eq!(resp.token.as_deref(), Some("t1"));
        assert_eq!(resp.user.unwrap().email, "a@a.com");
    }
}
