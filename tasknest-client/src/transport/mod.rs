//! Transport layer
//!
//! This module defines the request/response contract between the client and
//! the TaskNest API, and provides implementations of it.
//!
//! # Architecture
//!
//! A transport only moves requests and responses. It does not know about
//! sessions, tokens or error semantics. Those live in
//! [`crate::api::ApiClient`], which wraps any transport.
//!
//! # Transport Types
//!
//! - **Http**: `reqwest` against a real server
//! - **Mock**: in-memory emulation of the API for tests and demos
//!
//! # Example
//!
//! ```no_run
//! use tasknest_client::transport::{ApiRequest, MockTransport, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = MockTransport::new();
//! let response = transport
//!     .send(ApiRequest::post("/api/auth/register", serde_json::json!({ "email": "a@a.com" })))
//!     .await?;
//! assert_eq!(response.status, 201);
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod mock;
pub mod transport_trait;

// Re-export main types
pub use http::HttpTransport;
pub use mock::MockTransport;
pub use transport_trait::{ApiRequest, ApiResponse, Method, Transport, TransportError};
