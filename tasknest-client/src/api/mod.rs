//! TaskNest API access
//!
//! # Modules
//!
//! - [`client`]: [`ApiClient`], transport plus status mapping
//! - [`interceptor`]: [`AuthInterceptor`], bearer decoration and 401/403 handling
//! - [`auth`]: login and register
//! - [`tasks`]: task CRUD

pub mod auth;
pub mod client;
pub mod interceptor;
pub mod tasks;

pub use auth::AuthApi;
pub use client::ApiClient;
pub use interceptor::{AuthInterceptor, SESSION_EXPIRED_MESSAGE};
pub use tasks::TaskApi;
