//! reqwest-backed [`Transport`] for native callers.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::AuthConfig;
use crate::error::TransportError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport, decode_body};

/// Thin wrapper around a reqwest client bound to the auth API base URL.
///
/// Cookies set by the server are kept and replayed, matching the browser's
/// include-credentials mode.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    config: AuthConfig,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the underlying client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(config: AuthConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.config.url(request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.http.request(method, &url).header(CONTENT_TYPE, "application/json");
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(error = %e, %url, "auth request failed");
            TransportError::Request(e.to_string())
        })?;
        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok(ApiResponse::new(status, decode_body(&raw)))
    }
}
