//! Common test utilities for integration tests
//!
//! Wires a complete client over the in-memory mock server:
//! - `MockTransport` standing in for the API
//! - `MemoryStore` for the persisted session
//! - `ToastQueue`, `MemoryNavigator` and `ScriptedConfirmer` as the UI

#![allow(dead_code)]

use std::sync::Arc;
use tasknest_client::app::{App, AppParts};
use tasknest_client::session::MemoryStore;
use tasknest_client::transport::{Method, MockTransport};
use tasknest_client::ui::{
    MemoryNavigator, Navigator, NotificationKind, Route, ScriptedConfirmer, ToastQueue,
};
use tasknest_shared::models::User;

/// Test context holding the client and every collaborator
pub struct TestContext {
    pub app: App,
    pub server: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub toasts: Arc<ToastQueue>,
    pub navigator: Arc<MemoryNavigator>,
    pub confirmer: Arc<ScriptedConfirmer>,
}

impl TestContext {
    /// Signed-out client on the login screen
    ///
    /// `answers` scripts the confirmation dialog.
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self::with_parts(
            Arc::new(MockTransport::new()),
            Arc::new(MemoryStore::new()),
            Route::Login,
            answers,
        )
    }

    /// Client built over an existing server and store
    pub fn with_parts(
        server: Arc<MockTransport>,
        store: Arc<MemoryStore>,
        start: Route,
        answers: impl IntoIterator<Item = bool>,
    ) -> Self {
        let toasts = Arc::new(ToastQueue::default());
        let navigator = Arc::new(MemoryNavigator::new(start));
        let confirmer = Arc::new(ScriptedConfirmer::new(answers));

        let app = App::new(AppParts {
            transport: server.clone(),
            store: store.clone(),
            notifier: toasts.clone(),
            navigator: navigator.clone(),
            confirmer: confirmer.clone(),
        });

        TestContext {
            app,
            server,
            store,
            toasts,
            navigator,
            confirmer,
        }
    }

    /// Client already signed in as `email` and showing the task list
    pub async fn signed_in(email: &str) -> (Self, User) {
        let ctx = Self::new([false; 0]);
        let (user, token) = ctx.server.seed_user(email).await;
        ctx.app
            .sessions
            .establish_session(user.clone(), token)
            .expect("establish session");
        ctx.navigator.navigate(Route::Tasks);
        (ctx, user)
    }

    /// Error toasts shown so far
    pub fn errors(&self) -> Vec<String> {
        self.toasts_of(NotificationKind::Error)
    }

    /// Success toasts shown so far
    pub fn successes(&self) -> Vec<String> {
        self.toasts_of(NotificationKind::Success)
    }

    fn toasts_of(&self, kind: NotificationKind) -> Vec<String> {
        self.toasts
            .messages()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, message)| message)
            .collect()
    }

    /// Number of requests sent with `method` under `path_prefix`
    pub async fn sent(&self, method: Method, path_prefix: &str) -> usize {
        self.server.request_count(method, path_prefix).await
    }

    /// Waits until the server has received `count` matching requests
    pub async fn wait_for_requests(&self, method: Method, path_prefix: &str, count: usize) {
        while self.sent(method, path_prefix).await < count {
            tokio::task::yield_now().await;
        }
    }
}
