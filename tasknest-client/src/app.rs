//! Composition root
//!
//! Builds the session manager, the API client with its interceptor, the login
//! flow and the task list controller from a set of collaborators. Each piece
//! is constructed once here and shared by `Arc`.

use crate::api::{ApiClient, AuthApi, AuthInterceptor, TaskApi};
use crate::login::LoginFlow;
use crate::session::{KeyValueStore, SessionManager};
use crate::tasks::TaskListController;
use crate::transport::Transport;
use crate::ui::{Confirmer, Navigator, Notifier};
use std::sync::Arc;

/// Collaborators the client is built from
pub struct AppParts {
    pub transport: Arc<dyn Transport>,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub confirmer: Arc<dyn Confirmer>,
}

/// A fully wired client
pub struct App {
    pub sessions: Arc<SessionManager>,
    pub navigator: Arc<dyn Navigator>,
    pub login: LoginFlow,
    pub tasks: TaskListController,
}

impl App {
    /// Wires the client, restoring any persisted session
    pub fn new(parts: AppParts) -> Self {
        let AppParts {
            transport,
            store,
            notifier,
            navigator,
            confirmer,
        } = parts;

        let sessions = Arc::new(SessionManager::restore(store));
        let interceptor =
            AuthInterceptor::new(sessions.clone(), notifier.clone(), navigator.clone());
        let client = Arc::new(ApiClient::new(transport, interceptor));

        let login = LoginFlow::new(
            AuthApi::new(client.clone()),
            sessions.clone(),
            notifier.clone(),
            navigator.clone(),
            confirmer,
        );
        let tasks = TaskListController::new(TaskApi::new(client), notifier);

        App {
            sessions,
            navigator,
            login,
            tasks,
        }
    }
}
