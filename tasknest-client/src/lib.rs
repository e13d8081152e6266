//! # TaskNest Client
//!
//! Email sign-in and a personal task list, against the TaskNest API.
//!
//! ## Module Organization
//!
//! - `transport`: Request/response transport (reqwest, in-memory mock)
//! - `api`: Typed endpoints, bearer decoration and 401/403 handling
//! - `session`: Current user and token, persisted between runs
//! - `login`: Login-or-register orchestration
//! - `tasks`: Task list controller
//! - `ui`: Notification, navigation and confirmation collaborators
//! - `app`: Composition root
//! - `cli`: The `tasknest` command line
//! - `config`: Configuration management
//! - `error`: Client error types

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod login;
pub mod session;
pub mod tasks;
pub mod transport;
pub mod ui;

/// Current version of the TaskNest client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
