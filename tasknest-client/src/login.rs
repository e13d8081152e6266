//! Login orchestration
//!
//! Signs a user in by email, offering to create the account when the server
//! does not know it.
//!
//! # States
//!
//! ```text
//! Idle ──submit──> Submitting ──> Succeeded
//!                      │      └──> Failed
//!                      └─404──> AwaitingAccountConfirmation
//!                                   ├─confirm──> Submitting(register) ──> Succeeded | Failed
//!                                   └─decline──> Idle
//! ```
//!
//! The confirmation is the only point where the flow waits on the user. Any
//! failure other than "account not found" goes straight to `Failed` without
//! asking.
//!
//! # Example
//!
//! ```no_run
//! use tasknest_client::login::{LoginFlow, LoginOutcome};
//!
//! # async fn example(flow: LoginFlow) -> Result<(), Box<dyn std::error::Error>> {
//! match flow.submit("a@a.com").await? {
//!     LoginOutcome::SignedIn(user) | LoginOutcome::AccountCreated(user) => {
//!         println!("Signed in as {}", user.email);
//!     }
//!     LoginOutcome::Declined => {}
//!     LoginOutcome::Failed(message) => eprintln!("{}", message),
//! }
//! # Ok(())
//! # }
//! ```

use crate::api::AuthApi;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionManager;
use crate::ui::{ConfirmPrompt, Confirmer, Navigator, Notifier, Route};
use std::sync::Arc;
use tasknest_shared::models::{LoginForm, LoginResponse, User};
use tokio::sync::watch;
use validator::Validate;

/// Shown when login fails for any reason other than an unknown account
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error. Please try again.";

/// Shown when the account could not be created
pub const ACCOUNT_CREATION_FAILED_MESSAGE: &str = "Could not create the account.";

/// Login state machine position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    /// Waiting for input
    Idle,

    /// A login or register request is in flight
    Submitting,

    /// A session was established
    Succeeded,

    /// The user is being asked whether to create an account for `email`
    AwaitingAccountConfirmation { email: String },

    /// The attempt failed
    Failed { message: String },
}

/// Observable login screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginView {
    pub state: LoginState,
    pub loading: bool,
    pub error_message: Option<String>,
}

impl Default for LoginView {
    fn default() -> Self {
        LoginView {
            state: LoginState::Idle,
            loading: false,
            error_message: None,
        }
    }
}

/// How a submitted login ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Existing account, session established
    SignedIn(User),

    /// New account, session established
    AccountCreated(User),

    /// The user declined to create an account
    Declined,

    /// The attempt failed with the given user-facing message
    Failed(String),
}

/// Login orchestrator
pub struct LoginFlow {
    auth: AuthApi,
    sessions: Arc<SessionManager>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    confirmer: Arc<dyn Confirmer>,
    view: watch::Sender<LoginView>,
}

impl LoginFlow {
    pub fn new(
        auth: AuthApi,
        sessions: Arc<SessionManager>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        let (view, _) = watch::channel(LoginView::default());
        LoginFlow {
            auth,
            sessions,
            notifier,
            navigator,
            confirmer,
            view,
        }
    }

    /// Signs in with `email`, offering registration for unknown accounts
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a malformed email. Nothing is sent
    /// and the state is left as it was. Every other failure is reported
    /// through the returned outcome, the view and the notifier.
    pub async fn submit(&self, email: &str) -> ApiResult<LoginOutcome> {
        let form = LoginForm::new(email);
        form.validate()?;

        self.update(|v| {
            v.state = LoginState::Submitting;
            v.loading = true;
            v.error_message = None;
        });

        match self.auth.login(&form.email).await {
            Ok(response) => Ok(self.on_login_response(&form.email, response).await),
            Err(e) if e.is_not_found() => Ok(self.offer_registration(&form.email).await),
            Err(e) => {
                tracing::warn!(email = %form.email, error = %e, "Login failed");
                Ok(self.fail_after(&e, UNEXPECTED_ERROR_MESSAGE))
            }
        }
    }

    /// Snapshot of the current view
    pub fn view(&self) -> LoginView {
        self.view.borrow().clone()
    }

    /// Current state machine position
    pub fn state(&self) -> LoginState {
        self.view.borrow().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.view.borrow().loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.view.borrow().error_message.clone()
    }

    /// Subscribes to view changes
    pub fn subscribe(&self) -> watch::Receiver<LoginView> {
        self.view.subscribe()
    }

    async fn on_login_response(&self, email: &str, response: LoginResponse) -> LoginOutcome {
        match response {
            LoginResponse {
                exists: true,
                user: Some(user),
                token: Some(token),
            } => {
                let message = format!("Welcome back, {}!", user.email);
                match self.complete(user, token, &message) {
                    Some(user) => LoginOutcome::SignedIn(user),
                    None => self.fail(UNEXPECTED_ERROR_MESSAGE),
                }
            }
            LoginResponse { exists: false, .. } => self.offer_registration(email).await,
            LoginResponse { .. } => {
                tracing::warn!(%email, "Login response is missing the user or the token");
                self.fail(UNEXPECTED_ERROR_MESSAGE)
            }
        }
    }

    async fn offer_registration(&self, email: &str) -> LoginOutcome {
        self.update(|v| {
            v.state = LoginState::AwaitingAccountConfirmation {
                email: email.to_string(),
            };
            v.loading = false;
        });

        if !self.confirmer.confirm(ConfirmPrompt::create_account(email)).await {
            tracing::debug!(%email, "Account creation declined");
            self.update(|v| v.state = LoginState::Idle);
            return LoginOutcome::Declined;
        }

        self.update(|v| {
            v.state = LoginState::Submitting;
            v.loading = true;
        });

        let registered = match self.auth.register_and_login(email).await {
            Ok(registered) => registered,
            Err(e) => {
                tracing::warn!(%email, error = %e, "Account creation failed");
                return self.fail_after(&e, ACCOUNT_CREATION_FAILED_MESSAGE);
            }
        };

        tracing::info!(email = %registered.user.email, "Account created");
        let message = format!(
            "Account created successfully. Welcome, {}!",
            registered.user.email
        );
        match self.complete(registered.user, registered.token, &message) {
            Some(user) => LoginOutcome::AccountCreated(user),
            None => self.fail(ACCOUNT_CREATION_FAILED_MESSAGE),
        }
    }

    /// Establishes the session and moves to the task list
    fn complete(&self, user: User, token: String, message: &str) -> Option<User> {
        if let Err(e) = self.sessions.establish_session(user.clone(), token) {
            tracing::error!(email = %user.email, error = %e, "Failed to persist session");
            return None;
        }

        self.notifier.success(message);
        self.update(|v| {
            v.state = LoginState::Succeeded;
            v.loading = false;
        });
        self.navigator.navigate(Route::Tasks);
        Some(user)
    }

    fn fail(&self, message: &str) -> LoginOutcome {
        self.notifier.error(message);
        self.settle_failed(message)
    }

    /// Like [`fail`](Self::fail), but a rejected credential was already
    /// notified by the interceptor
    fn fail_after(&self, error: &ApiError, message: &str) -> LoginOutcome {
        if error.is_unauthorized() {
            return self.settle_failed(message);
        }
        self.fail(message)
    }

    fn settle_failed(&self, message: &str) -> LoginOutcome {
        self.update(|v| {
            v.state = LoginState::Failed {
                message: message.to_string(),
            };
            v.loading = false;
            v.error_message = Some(message.to_string());
        });
        LoginOutcome::Failed(message.to_string())
    }

    fn update(&self, f: impl FnOnce(&mut LoginView)) {
        self.view.send_modify(f);
    }
}
