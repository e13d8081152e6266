//! Session management
//!
//! This module owns the identity of the signed-in user and their bearer token.
//!
//! # Modules
//!
//! - [`storage`]: Key-value persistence (in-memory and file-backed)
//! - [`manager`]: The [`SessionManager`] holding the current session
//!
//! # Lifecycle
//!
//! ```text
//! startup ──restore──> Some(session) | None
//! login/register ──establish_session──> Some(session)
//! logout | 401/403 ──terminate_session──> None
//! ```
//!
//! The user and the token are always present together or absent together.

pub mod manager;
pub mod storage;

pub use manager::{Session, SessionManager};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, TOKEN_KEY, USER_KEY};
