//! API client
//!
//! [`ApiClient`] joins a [`Transport`] with the [`AuthInterceptor`] and turns
//! raw responses into typed results. Non-2xx statuses become [`ApiError`]s
//! carrying the server's `{"message": ...}` when one was sent.

use crate::api::interceptor::AuthInterceptor;
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tasknest_shared::models::ErrorBody;

/// Typed access to the TaskNest API
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    interceptor: AuthInterceptor,
}

impl ApiClient {
    /// Creates a client
    pub fn new(transport: Arc<dyn Transport>, interceptor: AuthInterceptor) -> Self {
        ApiClient {
            transport,
            interceptor,
        }
    }

    /// Sends a request that must not carry credentials (login, register)
    pub async fn send_public(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.dispatch(request).await
    }

    /// Sends a request with the current bearer token attached
    pub async fn send_protected(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let request = self.interceptor.decorate(request);
        self.dispatch(request).await
    }

    /// Sends a protected request and parses the JSON body
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let response = self.send_protected(request).await?;
        decode(&response)
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        tracing::debug!(
            transport = self.transport.name(),
            method = %request.method,
            path = %request.path,
            authorized = request.authorization.is_some(),
            "Sending API request"
        );

        let response = match self.transport.send(request.clone()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = %request.method, path = %request.path, error = %e, "API request failed");
                return Err(e.into());
            }
        };

        tracing::debug!(status = response.status, path = %request.path, "Received API response");

        if response.is_success() {
            return Ok(response);
        }

        self.interceptor.inspect(&request, &response);

        let message = ErrorBody::message_from(&response.body);
        if response.status >= 500 {
            tracing::warn!(status = response.status, path = %request.path, "Server error");
        }
        Err(ApiError::from_status(response.status, message))
    }
}

/// Parses a success body
pub(crate) fn decode<T: DeserializeOwned>(response: &ApiResponse) -> ApiResult<T> {
    response
        .parse()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Serializes a request body
pub(crate) fn encode(body: &impl Serialize) -> ApiResult<JsonValue> {
    serde_json::to_value(body)
        .map_err(|e| TransportError::InvalidRequest(e.to_string()).into())
}
