//! Session and profile records exchanged with the auth service.
//!
//! DESIGN
//! ======
//! The stored session is the server's sign-in response, kept verbatim.
//! Fields the client does not interpret (`token_type`, `expires_in`, ...) are
//! carried in `extra` so a save/load cycle reproduces the response exactly.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The locally cached identity and bearer token of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Opaque bearer credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// The same credential under the name the JWT backend uses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserSession {
    /// The credential to send as `Authorization: Bearer`, preferring
    /// `access_token` over `token`. Empty strings count as absent.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        fn present(token: &Option<String>) -> Option<&str> {
            token.as_deref().filter(|token| !token.is_empty())
        }
        present(&self.access_token).or_else(|| present(&self.token))
    }

    /// A session is usable only when it carries a non-empty token.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// Name to greet the user with, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("")
    }

    /// Overlay a profile-update response on this session.
    ///
    /// Response keys replace stored ones, except that a missing or empty
    /// token in the response never erases the stored token.
    ///
    /// # Errors
    ///
    /// Returns a serde error if the merged object no longer deserializes as a
    /// session (for example `name` became a number).
    pub fn merged_with(&self, update: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut merged = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in update {
            let is_token = key == "token" || key == "access_token";
            if is_token && !value.as_str().is_some_and(|token| !token.is_empty()) {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged))
    }
}

/// Profile returned by `GET /profile`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update sent to `PUT /profile`. Unset fields are left out of the body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfilePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}
