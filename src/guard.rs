//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes render through this so every view applies the same rule
//! and nothing route-dependent flashes on screen before the startup session
//! check has resolved.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::controller::{AuthStatus, Route};

/// What a protected route should do for the current auth status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session check still running: render neither content nor redirect.
    Defer,
    Render,
    Redirect(Route),
}

#[must_use]
pub fn guard(status: &AuthStatus) -> GuardDecision {
    match status {
        AuthStatus::Uninitialized | AuthStatus::Checking => GuardDecision::Defer,
        AuthStatus::Authenticated(_) => GuardDecision::Render,
        AuthStatus::Anonymous => GuardDecision::Redirect(Route::SignIn),
    }
}
