//! UI collaborators
//!
//! The session and task logic never render anything themselves. They talk to
//! the presentation layer through three small traits:
//!
//! - [`Notifier`]: transient success/error/info messages
//! - [`Navigator`]: which screen is shown (login or task list)
//! - [`Confirmer`]: a blocking yes/no question
//!
//! Each trait ships with an in-memory implementation used by the CLI and by
//! tests.

pub mod confirm;
pub mod navigation;
pub mod notify;

// Re-export main types
pub use confirm::{ConfirmPrompt, Confirmer, ScriptedConfirmer};
pub use navigation::{auth_guard, guest_guard, sign_out, MemoryNavigator, Navigator, Route};
pub use notify::{NotificationKind, Notifier, Toast, ToastQueue, TracingNotifier};
