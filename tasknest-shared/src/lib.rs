//! # TaskNest Shared Library
//!
//! This crate contains the data model and wire contract shared by the TaskNest
//! client library and its command-line front end.
//!
//! ## Module Organization
//!
//! - `models`: Users, tasks, auth request/response bodies and error bodies
//! - `validation`: Helpers for turning `validator` failures into messages

pub mod models;
pub mod validation;

/// Current version of the TaskNest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
