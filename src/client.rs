//! Auth API client: sign-up, sign-in, sign-out, profile, password change.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sits between the session controller and the remote auth service. It owns
//! the [`SessionStore`], attaching the stored bearer token to every
//! authenticated call (read fresh each time) and persisting sessions the
//! service issues.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is normalized into [`AuthError`]. A 401 on an authenticated
//! call comes back as [`AuthError::AuthorizationExpired`]; deciding what to do
//! about it (clear the store, redirect) belongs to the controller. A 401 on
//! sign-in or sign-up is a rejected credential and keeps the server message.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::AuthError;
use crate::session::{ProfilePatch, UserProfile, UserSession};
use crate::storage::Storage;
use crate::store::SessionStore;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const PROFILE_FAILED: &str = "Could not load your profile.";
pub const PROFILE_UPDATE_FAILED: &str = "Could not update your profile.";
pub const PASSWORD_CHANGE_FAILED: &str = "Could not change your password.";

const SIGNUP_PATH: &str = "/signup";
const SIGNIN_PATH: &str = "/signin";
const SIGNOUT_PATH: &str = "/signout";
const PROFILE_PATH: &str = "/profile";
const CHANGE_PASSWORD_PATH: &str = "/change-password";

/// Whether a 401 means "bad credentials" or "your token is no longer good".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    Public,
    Authenticated,
}

#[derive(Debug)]
pub struct AuthClient<T, S> {
    transport: T,
    store: SessionStore<S>,
}

impl<T: Transport, S: Storage> AuthClient<T, S> {
    pub fn new(transport: T, storage: S) -> Self {
        Self { transport, store: SessionStore::new(storage) }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The persisted session, if a valid one exists.
    #[must_use]
    pub fn current_user(&self) -> Option<UserSession> {
        self.store.load()
    }

    /// Register a new account via `POST /signup`.
    ///
    /// The returned record may or may not carry a token depending on server
    /// policy; when it does, it is persisted.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for a blank field, otherwise the server
    /// message or a generic registration failure.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let name = required(name.trim(), "Name is required.")?;
        let email = required(email.trim(), "Email is required.")?;
        let password = required(password, "Password is required.")?;

        let request = ApiRequest::new(Method::Post, SIGNUP_PATH)
            .json(json!({ "name": name, "email": email, "password": password }));
        let response = self.call(request, Access::Public, REGISTRATION_FAILED).await?;
        let session: UserSession = decode(response, REGISTRATION_FAILED)?;

        if session.is_valid() {
            self.store.save(&session)?;
        } else {
            tracing::info!(email, "sign-up succeeded without a session token");
        }
        Ok(session)
    }

    /// Authenticate via `POST /signin`.
    ///
    /// A response carrying a token is written to the store before returning.
    /// A failed call, or a response without a token, leaves the store as it
    /// was.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for a blank field, otherwise the server
    /// message or a generic login failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, AuthError> {
        let email = required(email.trim(), "Email is required.")?;
        let password = required(password, "Password is required.")?;

        let request = ApiRequest::new(Method::Post, SIGNIN_PATH).json(json!({ "email": email, "password": password }));
        let response = self.call(request, Access::Public, LOGIN_FAILED).await?;
        let session: UserSession = decode(response, LOGIN_FAILED)?;

        if session.is_valid() {
            self.store.save(&session)?;
        } else {
            tracing::warn!(email, "sign-in response carried no token");
        }
        Ok(session)
    }

    /// Notify the server via `POST /signout`, then clear the store.
    ///
    /// The network call is best effort; its failure is logged and the store
    /// is cleared regardless.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] only if the local slot cannot be removed.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let request = ApiRequest::new(Method::Post, SIGNOUT_PATH).bearer(self.store.current_token());
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => tracing::warn!(status = response.status, "sign-out rejected by server"),
            Err(e) => tracing::warn!(error = %e, "sign-out request failed"),
        }
        self.store.clear()?;
        Ok(())
    }

    /// Fetch the signed-in user's profile via `GET /profile`.
    ///
    /// # Errors
    ///
    /// [`AuthError::AuthorizationExpired`] on 401, otherwise the server
    /// message or a generic failure.
    pub async fn get_profile(&self) -> Result<UserProfile, AuthError> {
        let request = ApiRequest::new(Method::Get, PROFILE_PATH).bearer(self.store.current_token());
        let response = self.call(request, Access::Authenticated, PROFILE_FAILED).await?;
        decode(response, PROFILE_FAILED)
    }

    /// Update profile fields via `PUT /profile`.
    ///
    /// The response is merged over the stored session, keeping its token, and
    /// the merged record is persisted and returned.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] if the patch has nothing to change,
    /// [`AuthError::AuthorizationExpired`] on 401, otherwise the server
    /// message or a generic failure.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserSession, AuthError> {
        let patch = normalize_patch(patch);
        if patch.is_empty() {
            return Err(AuthError::Validation("Nothing to update.".to_owned()));
        }

        let body = serde_json::to_value(&patch).map_err(|e| AuthError::Validation(e.to_string()))?;
        let request = ApiRequest::new(Method::Put, PROFILE_PATH)
            .json(body)
            .bearer(self.store.current_token());
        let response = self.call(request, Access::Authenticated, PROFILE_UPDATE_FAILED).await?;
        let status = response.status;

        let update = match response.body {
            Some(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        let merged = match self.store.load() {
            Some(current) => current.merged_with(&update),
            None => serde_json::from_value(Value::Object(update)),
        }
        .map_err(|e| {
            tracing::warn!(error = %e, "profile update response did not merge");
            AuthError::Server { status, message: PROFILE_UPDATE_FAILED.to_owned() }
        })?;

        if merged.is_valid() {
            self.store.save(&merged)?;
        }
        Ok(merged)
    }

    /// Change the account password via `POST /change-password`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for a blank password,
    /// [`AuthError::AuthorizationExpired`] on 401, otherwise the server
    /// message or a generic failure.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<(), AuthError> {
        let current_password = required(current_password, "Current password is required.")?;
        let new_password = required(new_password, "New password is required.")?;

        let request = ApiRequest::new(Method::Post, CHANGE_PASSWORD_PATH)
            .json(json!({ "currentPassword": current_password, "newPassword": new_password }))
            .bearer(self.store.current_token());
        self.call(request, Access::Authenticated, PASSWORD_CHANGE_FAILED).await?;
        Ok(())
    }

    async fn call(&self, request: ApiRequest, access: Access, fallback: &str) -> Result<ApiResponse, AuthError> {
        let path = request.path;
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, path, "auth request did not complete");
            AuthError::Network(fallback.to_owned())
        })?;
        classify(response, access, fallback)
    }
}

fn classify(response: ApiResponse, access: Access, fallback: &str) -> Result<ApiResponse, AuthError> {
    if response.is_success() {
        return Ok(response);
    }
    if response.status == 401 && access == Access::Authenticated {
        return Err(AuthError::AuthorizationExpired);
    }
    let message = response.message().unwrap_or(fallback).to_owned();
    tracing::debug!(status = response.status, %message, "auth request rejected");
    Err(AuthError::Server { status: response.status, message })
}

/// Decode a 2xx body; an empty body decodes as the type's empty value.
fn decode<D: DeserializeOwned + Default>(response: ApiResponse, fallback: &str) -> Result<D, AuthError> {
    let Some(body) = response.body else {
        return Ok(D::default());
    };
    serde_json::from_value(body).map_err(|e| {
        tracing::warn!(error = %e, "unexpected auth response shape");
        AuthError::Server { status: response.status, message: fallback.to_owned() }
    })
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, AuthError> {
    if value.is_empty() {
        return Err(AuthError::Validation(message.to_owned()));
    }
    Ok(value)
}

fn normalize_patch(patch: &ProfilePatch) -> ProfilePatch {
    let clean = |field: &Option<String>| {
        field
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    };
    ProfilePatch { name: clean(&patch.name), email: clean(&patch.email) }
}
