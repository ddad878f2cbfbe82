//! Session controller: login state machine over the auth client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views hold a cloned [`SessionController`] handle (one per application
//! instance) instead of reaching for a global. The controller owns the
//! transitions
//!
//! ```text
//! Uninitialized -> Checking -> Authenticated(session) | Anonymous
//! ```
//!
//! and the navigation that follows them. Route guards only read its state.
//!
//! DESIGN
//! ======
//! Every login/register/logout bumps a generation counter and remembers the
//! value it started with. A response that comes back after the generation has
//! moved on is discarded, and the store is re-synced to the current state so a
//! late sign-in can never resurrect a session the user already left.
//!
//! The state mutex is only held for plain reads and writes, never across an
//! `.await` or a navigation callback.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::AuthClient;
use crate::error::AuthError;
use crate::session::{ProfilePatch, UserProfile, UserSession};
use crate::storage::Storage;
use crate::transport::Transport;

/// Where the controller stands on "who is signed in".
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AuthStatus {
    /// Constructed, startup check not yet run.
    #[default]
    Uninitialized,
    /// Startup check in progress; route-dependent content must not render.
    Checking,
    Authenticated(UserSession),
    Anonymous,
}

impl AuthStatus {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// True once the startup check has produced an answer.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Anonymous)
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Application routes the controller navigates between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    /// Default protected view.
    Dashboard,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::Dashboard => "/",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/signin" => Some(Self::SignIn),
            "/signup" => Some(Self::SignUp),
            "" | "/dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }
}

/// Performs the navigation that follows a state transition.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

impl<F: Fn(Route)> Navigator for F {
    fn navigate(&self, route: Route) {
        self(route);
    }
}

/// Point-in-time view of the controller for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub status: AuthStatus,
    /// Message from the most recent failed action.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct ControllerState {
    status: AuthStatus,
    error: Option<String>,
    generation: u64,
}

struct Inner<T, S, N> {
    client: AuthClient<T, S>,
    navigator: N,
    state: Mutex<ControllerState>,
}

/// Cloneable handle over one application's session state.
pub struct SessionController<T, S, N> {
    inner: Arc<Inner<T, S, N>>,
}

impl<T, S, N> Clone for SessionController<T, S, N> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Transport, S: Storage, N: Navigator> SessionController<T, S, N> {
    pub fn new(client: AuthClient<T, S>, navigator: N) -> Self {
        Self {
            inner: Arc::new(Inner { client, navigator, state: Mutex::new(ControllerState::default()) }),
        }
    }

    #[must_use]
    pub fn client(&self) -> &AuthClient<T, S> {
        &self.inner.client
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.inner.navigator
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot { status: state.status.clone(), error: state.error.clone() }
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.state().status.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().status.is_authenticated()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// The signed-in user held by the controller, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserSession> {
        self.state().status.user().cloned()
    }

    /// Run the startup check against the persisted session.
    ///
    /// Resolves once; later calls return the current status untouched.
    pub fn initialize(&self) -> AuthStatus {
        {
            let mut state = self.state();
            if state.status != AuthStatus::Uninitialized {
                return state.status.clone();
            }
            state.status = AuthStatus::Checking;
        }

        let resolved = match self.inner.client.current_user() {
            Some(session) => AuthStatus::Authenticated(session),
            None => AuthStatus::Anonymous,
        };
        tracing::debug!(authenticated = resolved.is_authenticated(), "session check resolved");

        let mut state = self.state();
        if state.status == AuthStatus::Checking {
            state.status = resolved;
        }
        state.status.clone()
    }

    /// Sign in and, on success, navigate to the dashboard.
    ///
    /// # Errors
    ///
    /// The sign-in failure (also recorded in [`SessionSnapshot::error`]),
    /// [`AuthError::MissingToken`] for a tokenless response, or
    /// [`AuthError::Superseded`] if another session change overtook it.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let generation = self.begin(true);
        let result = self.inner.client.sign_in(email, password).await;

        let outcome = {
            let mut state = self.state();
            if state.generation != generation {
                None
            } else {
                Some(match result {
                    Ok(session) if session.is_valid() => {
                        state.status = AuthStatus::Authenticated(session.clone());
                        Ok(session)
                    }
                    Ok(_) => Err(record(&mut state, AuthError::MissingToken)),
                    Err(e) => Err(record(&mut state, e)),
                })
            }
        };

        match outcome {
            None => Err(self.discard_stale("login")),
            Some(Ok(session)) => {
                tracing::info!(email = session.email.as_deref().unwrap_or(""), "signed in");
                self.inner.navigator.navigate(Route::Dashboard);
                Ok(session)
            }
            Some(Err(e)) => Err(e),
        }
    }

    /// Register and, when the server issues a token, sign straight in.
    ///
    /// Without a token the controller stays where it was and navigates to the
    /// sign-in page so the user signs in explicitly.
    ///
    /// # Errors
    ///
    /// The sign-up failure (also recorded in [`SessionSnapshot::error`]) or
    /// [`AuthError::Superseded`].
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let generation = self.begin(true);
        let result = self.inner.client.sign_up(name, email, password).await;

        let outcome = {
            let mut state = self.state();
            if state.generation != generation {
                None
            } else {
                Some(match result {
                    Ok(session) => {
                        if session.is_valid() {
                            state.status = AuthStatus::Authenticated(session.clone());
                        }
                        Ok(session)
                    }
                    Err(e) => Err(record(&mut state, e)),
                })
            }
        };

        match outcome {
            None => Err(self.discard_stale("register")),
            Some(Ok(session)) => {
                let route = if session.is_valid() { Route::Dashboard } else { Route::SignIn };
                self.inner.navigator.navigate(route);
                Ok(session)
            }
            Some(Err(e)) => Err(e),
        }
    }

    /// Sign out: anonymous immediately, store cleared, navigate to sign-in.
    ///
    /// The server notification is best effort and never blocks the local
    /// transition.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the local slot could not be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.status = AuthStatus::Anonymous;
            state.error = None;
            state.generation
        };

        let result = self.inner.client.sign_out().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "failed to clear session slot on logout");
        }

        if self.state().generation != generation {
            // A newer login finished while the sign-out request was out.
            self.resync_store();
            return result;
        }
        self.inner.navigator.navigate(Route::SignIn);
        result
    }

    /// Fetch the profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// The client error; [`AuthError::AuthorizationExpired`] additionally
    /// signs the user out locally.
    pub async fn get_profile(&self) -> Result<UserProfile, AuthError> {
        let generation = self.generation();
        self.inner
            .client
            .get_profile()
            .await
            .map_err(|e| self.on_request_error(e, generation))
    }

    /// Update profile fields and refresh the cached session.
    ///
    /// # Errors
    ///
    /// The client error; [`AuthError::AuthorizationExpired`] additionally
    /// signs the user out locally. [`AuthError::Superseded`] if the session
    /// changed while the update was in flight; the store is then re-synced.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserSession, AuthError> {
        let generation = self.generation();
        let session = self
            .inner
            .client
            .update_profile(patch)
            .await
            .map_err(|e| self.on_request_error(e, generation))?;

        {
            let mut state = self.state();
            if state.generation == generation {
                if state.status.is_authenticated() && session.is_valid() {
                    state.status = AuthStatus::Authenticated(session.clone());
                }
                return Ok(session);
            }
        }
        // The client merged the reply into whatever session is stored now.
        Err(self.discard_stale("update_profile"))
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// The client error; [`AuthError::AuthorizationExpired`] additionally
    /// signs the user out locally.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<(), AuthError> {
        let generation = self.generation();
        self.inner
            .client
            .change_password(current_password, new_password)
            .await
            .map_err(|e| self.on_request_error(e, generation))
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generation(&self) -> u64 {
        self.state().generation
    }

    /// Start a session-changing action. The startup check is run first so
    /// the store can always be resynced to a resolved status.
    fn begin(&self, clear_error: bool) -> u64 {
        self.initialize();
        let mut state = self.state();
        state.generation += 1;
        if clear_error {
            state.error = None;
        }
        state.generation
    }

    /// Handle a failed authenticated request issued at `generation`.
    fn on_request_error(&self, error: AuthError, generation: u64) -> AuthError {
        if !error.is_authorization_expired() {
            return error;
        }

        {
            let mut state = self.state();
            if state.generation != generation {
                // The rejected token belongs to a session that is already gone.
                return error;
            }
            state.generation += 1;
            state.status = AuthStatus::Anonymous;
            state.error = Some(error.message());
        }

        tracing::info!("session expired; signing out locally");
        if let Err(e) = self.inner.client.store().clear() {
            tracing::warn!(error = %e, "failed to clear expired session");
        }
        self.inner.navigator.navigate(Route::SignIn);
        error
    }

    fn discard_stale(&self, action: &str) -> AuthError {
        tracing::debug!(action, "discarding stale auth response");
        self.resync_store();
        AuthError::Superseded
    }

    /// Make the persisted slot agree with the controller's current status.
    fn resync_store(&self) {
        let status = self.status();
        let store = self.inner.client.store();
        let result = match status.user() {
            Some(session) => store.save(session),
            None => store.clear(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to resync session slot");
        }
    }
}

fn record(state: &mut ControllerState, error: AuthError) -> AuthError {
    state.error = Some(error.message());
    error
}
