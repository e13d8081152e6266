//! Session manager
//!
//! Holds the current [`Session`] and mirrors it into a [`KeyValueStore`].
//! Dependents observe changes through a `tokio::sync::watch` channel.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasknest_client::session::{MemoryStore, SessionManager};
//! # use tasknest_shared::models::User;
//!
//! # fn example(user: User) -> Result<(), Box<dyn std::error::Error>> {
//! let sessions = SessionManager::restore(Arc::new(MemoryStore::new()));
//! let mut changes = sessions.subscribe();
//!
//! sessions.establish_session(user, "t1".to_string())?;
//! assert_eq!(sessions.current_token().as_deref(), Some("t1"));
//! assert!(changes.has_changed()?);
//! # Ok(())
//! # }
//! ```

use crate::session::storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};
use std::sync::Arc;
use tasknest_shared::models::User;
use tokio::sync::watch;

/// The signed-in user together with their bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Authenticated user
    pub user: User,

    /// Bearer token for protected requests
    pub token: String,
}

/// Owner of the current session
pub struct SessionManager {
    /// Durable copy of the session
    store: Arc<dyn KeyValueStore>,

    /// Current session, `None` when signed out
    state: watch::Sender<Option<Session>>,
}

impl SessionManager {
    /// Creates a signed-out manager without reading the store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(None);
        SessionManager { store, state }
    }

    /// Creates a manager seeded from whatever the store holds
    ///
    /// The token is not checked against the server. An expired token is
    /// discovered on the first protected request.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let manager = SessionManager::new(store);
        manager.restore_on_startup();
        manager
    }

    /// Reloads the session from the store and notifies subscribers
    ///
    /// A store holding only one of the two entries, or an unreadable user,
    /// counts as signed out and is cleared.
    pub fn restore_on_startup(&self) -> Option<User> {
        let restored = match self.load() {
            Ok(Some(session)) => {
                tracing::info!(email = %session.user.email, "Restored persisted session");
                Some(session)
            }
            Ok(None) => None,
            Err(reason) => {
                tracing::warn!(%reason, "Discarding inconsistent persisted session");
                self.clear_store();
                None
            }
        };

        let user = restored.as_ref().map(|s| s.user.clone());
        self.state.send_replace(restored);
        user
    }

    /// Persists the session and makes it current
    ///
    /// This is the only way a session becomes populated.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. The current session
    /// is left unchanged in that case.
    pub fn establish_session(&self, user: User, token: String) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&user)?;
        self.store
            .set_all(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])?;

        tracing::info!(email = %user.email, "Session established");
        self.state.send_replace(Some(Session { user, token }));
        Ok(())
    }

    /// Clears the session and the store
    ///
    /// Safe to call when already signed out. Subscribers are only notified
    /// when a session was actually cleared.
    pub fn terminate_session(&self) {
        self.clear_store();

        let cleared = self.state.send_if_modified(|current| current.take().is_some());
        if cleared {
            tracing::info!("Session terminated");
        }
    }

    /// Bearer token of the current session
    pub fn current_token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }

    /// User of the current session
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// True while a session is held
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Subscribes to session changes
    ///
    /// The receiver starts with the current value marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    fn load(&self) -> Result<Option<Session>, String> {
        let token = self.store.get(TOKEN_KEY).map_err(|e| e.to_string())?;
        let user = self.store.get(USER_KEY).map_err(|e| e.to_string())?;

        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(raw_user)) => {
                let user: User = serde_json::from_str(&raw_user)
                    .map_err(|e| format!("unreadable user entry: {}", e))?;
                Ok(Some(Session { user, token }))
            }
            (Some(_), None) => Err("token without user".to_string()),
            (None, Some(_)) => Err("user without token".to_string()),
        }
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.remove_all(&[TOKEN_KEY, USER_KEY]) {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }
}
