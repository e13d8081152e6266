//! Navigation and route guards
//!
//! The client has two screens: the login entry point and the task list.
//!
//! # Guards
//!
//! - [`guest_guard`]: the login screen is only for visitors without a token;
//!   signed-in users are sent to the task list
//! - [`auth_guard`]: the task list needs a token; visitors are sent to login

use crate::session::SessionManager;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// A screen of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Login entry point
    Login,

    /// Task list
    Tasks,
}

impl Route {
    /// URL path of the route
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Tasks => "/tasks",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Screen switcher
pub trait Navigator: Send + Sync {
    /// Route currently shown
    fn current_route(&self) -> Route;

    /// Shows `route`
    fn navigate(&self, route: Route);
}

#[derive(Debug)]
struct NavState {
    current: Route,
    visits: Vec<Route>,
}

/// In-memory navigator that records every navigation
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<NavState>,
}

impl MemoryNavigator {
    /// Creates a navigator showing `start`
    pub fn new(start: Route) -> Self {
        MemoryNavigator {
            state: Mutex::new(NavState {
                current: start,
                visits: Vec::new(),
            }),
        }
    }

    /// Routes navigated to, in order (the start route is not included)
    pub fn visits(&self) -> Vec<Route> {
        self.with_state(|s| s.visits.clone())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut NavState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        MemoryNavigator::new(Route::Login)
    }
}

impl Navigator for MemoryNavigator {
    fn current_route(&self) -> Route {
        self.with_state(|s| s.current)
    }

    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "Navigating");
        self.with_state(|s| {
            s.current = route;
            s.visits.push(route);
        });
    }
}

/// Allows the login screen only without a token
///
/// Redirects to the task list and returns `false` otherwise.
pub fn guest_guard(sessions: &SessionManager, navigator: &dyn Navigator) -> bool {
    if sessions.current_token().is_none() {
        return true;
    }
    navigator.navigate(Route::Tasks);
    false
}

/// Allows the task list only with a token
///
/// Redirects to login and returns `false` otherwise.
pub fn auth_guard(sessions: &SessionManager, navigator: &dyn Navigator) -> bool {
    if sessions.current_token().is_some() {
        return true;
    }
    navigator.navigate(Route::Login);
    false
}

/// Explicit logout: clears the session and shows the login screen
pub fn sign_out(sessions: &SessionManager, navigator: &dyn Navigator) {
    sessions.terminate_session();
    navigator.navigate(Route::Login);
}
