//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The [`WebController`] is the single owner of session state. Views never
//! mutate [`AuthState`] directly: after driving the controller they call
//! [`publish`] so the reactive mirror picks up the new snapshot.
//!
//! Controller navigation lands in [`SignalNavigator`]'s pending slot and is
//! performed by the router-side bridge in `app`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use authapp::{AuthStatus, Navigator, Route, SessionController, SessionSnapshot, UserSession};
use leptos::prelude::*;

use crate::net::transport::BrowserTransport;
use crate::util::storage::LocalStorage;

pub type WebController = SessionController<BrowserTransport, LocalStorage, SignalNavigator>;

/// Reactive mirror of the controller's [`SessionSnapshot`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub error: Option<String>,
}

impl From<SessionSnapshot> for AuthState {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self { status: snapshot.status, error: snapshot.error }
    }
}

impl AuthState {
    /// True once the startup session check has resolved.
    pub fn initialized(&self) -> bool {
        self.status.is_resolved()
    }

    pub fn user(&self) -> Option<&UserSession> {
        self.status.user()
    }

    /// Greeting name: the user's name, else their email.
    pub fn display_name(&self) -> Option<String> {
        self.user().map(|user| user.display_name().to_owned())
    }
}

/// Copy the controller's current state into the reactive mirror.
pub fn publish(controller: &WebController, auth: RwSignal<AuthState>) {
    let next = AuthState::from(controller.snapshot());
    if auth.get_untracked() != next {
        auth.set(next);
    }
}

/// [`Navigator`] that parks the requested route in a signal.
#[derive(Clone, Copy, Debug)]
pub struct SignalNavigator {
    pending: RwSignal<Option<Route>>,
}

impl SignalNavigator {
    pub fn new() -> Self {
        Self { pending: RwSignal::new(None) }
    }

    pub fn pending(&self) -> RwSignal<Option<Route>> {
        self.pending
    }
}

impl Default for SignalNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for SignalNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "navigation requested");
        self.pending.set(Some(route));
    }
}
