//! Browser `fetch` transport for the auth API.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`, with credentials
//! included so the server's session cookie rides along with the bearer token.
//! Native builds: every request fails with a [`TransportError`], which the
//! auth client reports as a network failure.
//!
//! CONFIGURATION
//! =============
//! The page has no process environment, so `AUTH_API_URL` and
//! `AUTH_REQUEST_TIMEOUT_SECS` are read when the crate is compiled.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use authapp::{ApiRequest, ApiResponse, AuthConfig, Transport, TransportError};

/// Auth API settings captured at build time.
#[must_use]
pub fn api_config() -> AuthConfig {
    AuthConfig::from_lookup(build_env)
}

fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "AUTH_API_URL" => option_env!("AUTH_API_URL"),
        "AUTH_REQUEST_TIMEOUT_SECS" => option_env!("AUTH_REQUEST_TIMEOUT_SECS"),
        _ => None,
    };
    value.map(str::to_owned)
}

#[derive(Clone, Debug)]
pub struct BrowserTransport {
    config: AuthConfig,
}

impl BrowserTransport {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::{Method as HttpMethod, RequestBuilder};

            let url = self.config.url(request.path);
            let method = match request.method {
                authapp::Method::Get => HttpMethod::GET,
                authapp::Method::Post => HttpMethod::POST,
                authapp::Method::Put => HttpMethod::PUT,
            };

            let mut builder = RequestBuilder::new(&url)
                .method(method)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .credentials(web_sys::RequestCredentials::Include);
            if let Some(token) = request.bearer.as_deref() {
                builder = builder.header("Authorization", &format!("Bearer {token}"));
            }

            let prepared = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError::Request(e.to_string()))?;

            let resp = prepared.send().await.map_err(|e| {
                tracing::debug!(error = %e, url = %url, "fetch failed");
                TransportError::Request(e.to_string())
            })?;
            let status = resp.status();
            let raw = resp.text().await.map_err(|e| TransportError::Decode(e.to_string()))?;
            Ok(ApiResponse::new(status, authapp::transport::decode_body(&raw)))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError::Request(format!(
                "{} {} requires a browser",
                request.method.as_str(),
                self.config.url(request.path)
            )))
        }
    }
}
