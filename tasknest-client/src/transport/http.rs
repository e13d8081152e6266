//! HTTP transport backed by `reqwest`
//!
//! Joins the configured base URL with each request path, sends JSON bodies and
//! returns the status and body text of whatever the server answered.
//!
//! # Example
//!
//! ```no_run
//! use tasknest_client::config::ClientConfig;
//! use tasknest_client::transport::{ApiRequest, HttpTransport, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::from_config(&ClientConfig::default())?;
//! let response = transport.send(ApiRequest::get("/api/tasks").with_bearer("t1")).await?;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header;

/// HTTP transport
pub struct HttpTransport {
    /// Base URL without trailing slash
    base_url: String,

    /// Underlying HTTP client
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport honouring the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialisation fails)
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("tasknest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(HttpTransport {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Full URL for a request path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };

        if let Some(value) = &request.authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read body: {}", e)))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_for(base_url: &str) -> HttpTransport {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        HttpTransport::from_config(&config).unwrap()
    }

    #[test]
    fn test_url_for() {
        let transport = transport_for("http://localhost:3000/");
        assert_eq!(
            transport.url_for("/api/tasks/9"),
            "http://localhost:3000/api/tasks/9"
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = ClientConfig::default();
        config.api.base_url = "https://tasks.example.com".to_string();

        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.name(), "http");
        assert_eq!(
            transport.url_for("/api/auth/login"),
            "https://tasks.example.com/api/auth/login"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let transport = transport_for("http://127.0.0.1:9");
        let result = transport.send(ApiRequest::get("/api/tasks")).await;
        assert!(result.is_err());
    }
}
