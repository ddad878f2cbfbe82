//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the shared [`crate::state::auth::AuthState`] mirror and
//! the controller handle from Leptos context providers.

pub mod nav_bar;
pub mod protected;
