//! Notifications
//!
//! The only contract with the core is `notify(message, kind)`. Timing and
//! display belong to the implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
            NotificationKind::Info => write!(f, "info"),
        }
    }
}

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    /// Shows a message
    fn notify(&self, message: &str, kind: NotificationKind);

    /// Shows a success message
    fn success(&self, message: &str) {
        self.notify(message, NotificationKind::Success);
    }

    /// Shows an error message
    fn error(&self, message: &str) {
        self.notify(message, NotificationKind::Error);
    }

    /// Shows an informational message
    fn info(&self, message: &str) {
        self.notify(message, NotificationKind::Info);
    }
}

/// A notification as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

#[derive(Debug, Default)]
struct ToastLog {
    /// Every toast ever shown, oldest first
    shown: Vec<Toast>,

    /// Index of the first toast not yet returned by `drain_new`
    cursor: usize,
}

/// Toast queue with auto-dismiss
///
/// Toasts stay active for `ttl` after being shown. The full history is kept
/// so callers can replay what the user saw.
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    log: Mutex<ToastLog>,
}

impl ToastQueue {
    /// Creates a queue whose toasts expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        ToastQueue {
            ttl,
            log: Mutex::new(ToastLog::default()),
        }
    }

    /// Toasts shown less than `ttl` ago, oldest first
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        self.with_log(|log| {
            log.shown
                .iter()
                .filter(|t| now.duration_since(t.shown_at) < self.ttl)
                .cloned()
                .collect()
        })
    }

    /// Every toast shown so far
    pub fn history(&self) -> Vec<Toast> {
        self.with_log(|log| log.shown.clone())
    }

    /// Messages of every toast shown so far, with their kind
    pub fn messages(&self) -> Vec<(NotificationKind, String)> {
        self.with_log(|log| {
            log.shown
                .iter()
                .map(|t| (t.kind, t.message.clone()))
                .collect()
        })
    }

    /// Toasts shown since the previous call
    pub fn drain_new(&self) -> Vec<Toast> {
        self.with_log(|log| {
            let fresh = log.shown[log.cursor..].to_vec();
            log.cursor = log.shown.len();
            fresh
        })
    }

    fn with_log<T>(&self, f: impl FnOnce(&mut ToastLog) -> T) -> T {
        // A panic while holding the lock cannot leave the log half-written
        let mut log = self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut log)
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        ToastQueue::new(Duration::from_millis(3000))
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str, kind: NotificationKind) {
        self.with_log(|log| {
            log.shown.push(Toast {
                message: message.to_string(),
                kind,
                shown_at: Instant::now(),
            })
        });
    }
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => tracing::warn!(%kind, "{}", message),
            _ => tracing::info!(%kind, "{}", message),
        }
    }
}
