//! Persistence of the signed-in user's session in a single storage slot.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth client reads the bearer token from here on every request and the
//! session controller restores login state from here on startup. Only those
//! two write to it.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::error::StoreError;
use crate::session::UserSession;
use crate::storage::Storage;

/// Storage key holding the JSON-encoded [`UserSession`].
pub const SESSION_KEY: &str = "user";

/// JSON codec and validity rules over one [`Storage`] slot.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist `session`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingToken`] without writing if the session has
    /// no token, or a storage/encoding error.
    pub fn save(&self, session: &UserSession) -> Result<(), StoreError> {
        if !session.is_valid() {
            return Err(StoreError::MissingToken);
        }
        let raw = serde_json::to_string(session)?;
        self.storage.set_item(SESSION_KEY, &raw)?;
        Ok(())
    }

    /// The persisted session, or `None` if absent, unreadable, or invalid.
    #[must_use]
    pub fn load(&self) -> Option<UserSession> {
        let raw = match self.storage.get_item(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "session slot unreadable");
                return None;
            }
        };

        let session = match serde_json::from_str::<UserSession>(&raw) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed session record");
                return None;
            }
        };

        session.is_valid().then_some(session)
    }

    /// Remove the persisted session. Safe to call when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the slot exists but cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_item(SESSION_KEY)?;
        Ok(())
    }

    /// Bearer token of the persisted session, if any.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.load().and_then(|session| session.bearer_token().map(str::to_owned))
    }
}
