//! Authentication endpoints
//!
//! Neither call touches the session. Callers decide what to do with the
//! result and call [`SessionManager::establish_session`] themselves.
//!
//! [`SessionManager::establish_session`]: crate::session::SessionManager::establish_session

use crate::api::client::{decode, encode, ApiClient};
use crate::error::ApiResult;
use crate::transport::ApiRequest;
use std::sync::Arc;
use tasknest_shared::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Login endpoint path
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Register endpoint path
pub const REGISTER_PATH: &str = "/api/auth/register";

/// Client for `/api/auth`
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        AuthApi { client }
    }

    /// Asks the server whether an account exists for `email`
    ///
    /// An unknown email comes back as `ApiError::NotFound`.
    pub async fn login(&self, email: &str) -> ApiResult<LoginResponse> {
        let body = encode(&LoginRequest {
            email: email.to_string(),
        })?;
        let response = self
            .client
            .send_public(ApiRequest::post(LOGIN_PATH, body))
            .await?;
        decode(&response)
    }

    /// Creates an account and returns its first credential
    pub async fn register_and_login(&self, email: &str) -> ApiResult<RegisterResponse> {
        let body = encode(&RegisterRequest {
            email: email.to_string(),
        })?;
        let response = self
            .client
            .send_public(ApiRequest::post(REGISTER_PATH, body))
            .await?;
        decode(&response)
    }
}
