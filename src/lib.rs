//! # authapp
//!
//! Session-aware client for a remote email/password authentication API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views (the Leptos `client` crate, the `cli` binary) talk to a
//! [`controller::SessionController`], which drives an [`client::AuthClient`]
//! over a pluggable [`transport::Transport`] and keeps the persisted
//! [`store::SessionStore`] in step with the in-memory auth state.
//! [`guard::guard`] turns that state into a render/redirect decision.
//!
//! The crate builds for both native and `wasm32` targets. The reqwest-backed
//! transport is gated behind the default `reqwest` feature.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod guard;
#[cfg(feature = "reqwest")]
pub mod http;
pub mod session;
pub mod storage;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::AuthClient;
pub use config::AuthConfig;
pub use controller::{AuthStatus, Navigator, Route, SessionController, SessionSnapshot};
pub use error::{AuthError, StorageError, StoreError, TransportError};
pub use guard::{GuardDecision, guard};
pub use session::{ProfilePatch, UserProfile, UserSession};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{SESSION_KEY, SessionStore};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
