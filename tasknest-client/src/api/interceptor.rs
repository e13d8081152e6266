//! Request decoration and global auth-failure handling
//!
//! Every request the [`ApiClient`](super::ApiClient) sends passes through an
//! [`AuthInterceptor`] twice:
//!
//! - **Decoration**: protected requests get `Authorization: Bearer <token>`
//!   when a session is held, and go out undecorated otherwise
//! - **Inspection**: a 401 or 403 response tears the session down, tells the
//!   user their session expired and shows the login screen
//!
//! The interceptor never swallows the failure. The caller still receives the
//! `Unauthorized` error after the side effects have run.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasknest_client::api::AuthInterceptor;
//! use tasknest_client::session::{MemoryStore, SessionManager};
//! use tasknest_client::transport::ApiRequest;
//! use tasknest_client::ui::{MemoryNavigator, TracingNotifier};
//!
//! let sessions = Arc::new(SessionManager::new(Arc::new(MemoryStore::new())));
//! let interceptor = AuthInterceptor::new(
//!     sessions,
//!     Arc::new(TracingNotifier),
//!     Arc::new(MemoryNavigator::default()),
//! );
//!
//! // Signed out: nothing to attach
//! let request = interceptor.decorate(ApiRequest::get("/api/tasks"));
//! assert!(request.authorization.is_none());
//! ```

use crate::session::SessionManager;
use crate::transport::{ApiRequest, ApiResponse};
use crate::ui::{Navigator, Notifier, Route};
use std::sync::Arc;

/// Notification shown when the server rejects the credential
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Decorator and observer around every API request
pub struct AuthInterceptor {
    sessions: Arc<SessionManager>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl AuthInterceptor {
    /// Creates an interceptor
    pub fn new(
        sessions: Arc<SessionManager>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        AuthInterceptor {
            sessions,
            notifier,
            navigator,
        }
    }

    /// Attaches the current bearer token, if any
    pub fn decorate(&self, request: ApiRequest) -> ApiRequest {
        match self.sessions.current_token() {
            Some(token) => request.with_bearer(&token),
            None => request,
        }
    }

    /// Reacts to an authorization failure
    ///
    /// Returns `true` if `response` was a 401/403 and the session was torn
    /// down.
    pub fn inspect(&self, request: &ApiRequest, response: &ApiResponse) -> bool {
        if !matches!(response.status, 401 | 403) {
            return false;
        }

        tracing::warn!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            "Credential rejected, terminating session"
        );

        self.sessions.terminate_session();
        self.notifier.error(SESSION_EXPIRED_MESSAGE);

        if self.navigator.current_route() != Route::Login {
            self.navigator.navigate(Route::Login);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use crate::ui::{MemoryNavigator, NotificationKind, ToastQueue};
    use chrono::Utc;
    use tasknest_shared::models::User;

    struct Fixture {
        sessions: Arc<SessionManager>,
        toasts: Arc<ToastQueue>,
        navigator: Arc<MemoryNavigator>,
        interceptor: AuthInterceptor,
    }

    fn fixture(start: Route) -> Fixture {
        let sessions = Arc::new(SessionManager::new(Arc::new(MemoryStore::new())));
        let toasts = Arc::new(ToastQueue::default());
        let navigator = Arc::new(MemoryNavigator::new(start));
        let interceptor =
            AuthInterceptor::new(sessions.clone(), toasts.clone(), navigator.clone());
        Fixture {
            sessions,
            toasts,
            navigator,
            interceptor,
        }
    }

    fn sign_in(sessions: &SessionManager) {
        sessions
            .establish_session(User::new("a@a.com", "a@a.com", Utc::now()), "t1".to_string())
            .unwrap();
    }

    #[test]
    fn test_decorate_with_token() {
        let f = fixture(Route::Tasks);
        sign_in(&f.sessions);

        let request = f.interceptor.decorate(ApiRequest::get("/api/tasks"));
        assert_eq!(request.authorization.as_deref(), Some("Bearer t1"));
    }

    #[test]
    fn test_decorate_without_token() {
        let f = fixture(Route::Login);
        let request = f.interceptor.decorate(ApiRequest::get("/api/tasks"));
        assert_eq!(request.authorization, None);
    }

    #[test]
    fn test_inspect_ignores_other_statuses() {
        let f = fixture(Route::Tasks);
        sign_in(&f.sessions);

        for status in [200, 204, 400, 404, 500] {
            let handled = f
                .interceptor
                .inspect(&ApiRequest::get("/api/tasks"), &ApiResponse::empty(status));
            assert!(!handled);
        }

        assert!(f.sessions.is_authenticated());
        assert!(f.toasts.history().is_empty());
        assert!(f.navigator.visits().is_empty());
    }

    #[test]
    fn test_inspect_tears_down_on_401_and_403() {
        for status in [401, 403] {
            let f = fixture(Route::Tasks);
            sign_in(&f.sessions);

            let handled = f
                .interceptor
                .inspect(&ApiRequest::get("/api/tasks"), &ApiResponse::empty(status));

            assert!(handled);
            assert!(!f.sessions.is_authenticated());
            assert_eq!(
                f.toasts.messages(),
                vec![(NotificationKind::Error, SESSION_EXPIRED_MESSAGE.to_string())]
            );
            assert_eq!(f.navigator.visits(), vec![Route::Login]);
        }
    }

    #[test]
    fn test_inspect_does_not_renavigate_from_login() {
        let f = fixture(Route::Login);
        f.interceptor
            .inspect(&ApiRequest::get("/api/tasks"), &ApiResponse::empty(401));

        assert!(f.navigator.visits().is_empty());
        assert_eq!(f.toasts.history().len(), 1);
    }
}
