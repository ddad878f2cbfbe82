//! HTTP seam between the auth client and whatever performs the request.
//!
//! DESIGN
//! ======
//! The auth client builds [`ApiRequest`]s and classifies [`ApiResponse`]s;
//! a [`Transport`] only moves bytes. Native builds use
//! [`crate::http::ReqwestTransport`], the web client plugs in a `gloo-net`
//! fetch transport, and tests script responses directly.
//!
//! Futures are not required to be `Send`: everything runs on one logical
//! thread (browser event loop or a current-thread runtime).

use serde_json::Value;

use crate::error::TransportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

/// One call to the auth service, relative to the configured base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path under the base URL, always starting with `/`.
    pub path: &'static str,
    pub body: Option<Value>,
    /// Token sent as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: &'static str) -> Self {
        Self { method, path, body: None, bearer: None }
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// Status and decoded JSON body of a completed request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` when the body was empty or not JSON.
    pub body: Option<Value>,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Server-supplied `message` field, if the body carries one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Performs [`ApiRequest`]s against the auth service.
#[async_trait::async_trait(?Send)]
pub trait Transport {
    /// Send `request` and return whatever status the server answered with.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] only when no response was obtained.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Parse a raw response body, treating empty or non-JSON bodies as absent.
#[must_use]
pub fn decode_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;
