//! Networking for the auth API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` adapts the browser `fetch` API to [`authapp::Transport`] and
//! resolves the API base URL baked in at build time.

pub mod transport;
