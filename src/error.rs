//! Error types shared across the storage, transport, and client layers.
//!
//! ERROR HANDLING
//! ==============
//! Transport and server failures are normalized into [`AuthError`] at the
//! [`crate::client::AuthClient`] boundary so views only ever deal with one
//! human-readable message per failure.

/// Failure reading or writing a durable key-value slot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure persisting a session record.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Tokenless records are never persisted.
    #[error("session has no token; refusing to persist")]
    MissingToken,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A request that could not be completed at the HTTP level.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("response decode failed: {0}")]
    Decode(String),
}

/// Error surfaced to callers of the auth client and session controller.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required field was missing; rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// Non-2xx response from the auth service.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// A bearer-authenticated request was rejected with 401.
    #[error("Your session has expired. Please sign in again.")]
    AuthorizationExpired,
    /// A sign-in response carried no token.
    #[error("Login failed. The server did not issue a session token.")]
    MissingToken,
    /// A newer login/register/logout ran while this request was in flight.
    #[error("request superseded by a newer session change")]
    Superseded,
    #[error("failed to persist session: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// Human-readable text for display next to a form.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether this error means the stored session is no longer usable.
    #[must_use]
    pub fn is_authorization_expired(&self) -> bool {
        matches!(self, Self::AuthorizationExpired)
    }
}
