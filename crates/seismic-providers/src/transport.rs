//! HTTP transport used by the fetcher.
//!
//! The fetcher only needs a GET with query parameters and a per-request
//! timeout, so the transport is a small trait. [`ReqwestTransport`] is the
//! production implementation; tests script responses instead.

use std::time::Duration;

use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::BoxFuture;

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = concat!("seismic/", env!("CARGO_PKG_VERSION"));

/// A GET request to an upstream catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub timeout: Duration,
}

/// The parts of an HTTP response the fetcher looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw `Retry-After` header value, if present.
    pub retry_after: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// Builder method to set the `Retry-After` header.
    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Executes upstream requests.
///
/// Implementations return `Err` only when no response was received at all;
/// HTTP error statuses are returned as `Ok` responses so the caller can
/// decide about retries.
pub trait HttpTransport: Send + Sync {
    fn get<'a>(&'a self, request: &'a HttpRequest) -> BoxFuture<'a, ProviderResult<HttpResponse>>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ProviderError::network(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(&'a self, request: &'a HttpRequest) -> BoxFuture<'a, ProviderResult<HttpResponse>> {
        Box::pin(async move {
            debug!(url = %request.url, params = ?request.params, "Sending upstream request");

            let response = self
                .client
                .get(&request.url)
                .query(&request.params)
                .timeout(request.timeout)
                .send()
                .await
                .map_err(map_send_error)?;

            let status = response.status().as_u16();
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let body = response.text().await.map_err(|e| {
                ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
            })?;

            Ok(HttpResponse {
                status,
                retry_after,
                body,
            })
        })
    }
}

fn map_send_error(e: reqwest::Error) -> ProviderError {
    let message = if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    };
    ProviderError::network(message).with_source(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_classification() {
        assert!(HttpResponse::new(429, "").is_rate_limited());
        assert!(HttpResponse::new(429, "").is_error());
        assert!(HttpResponse::new(404, "").is_error());
        assert!(!HttpResponse::new(200, "{}").is_error());
        assert!(!HttpResponse::new(204, "").is_rate_limited());
    }

    #[test]
    fn retry_after_builder() {
        let r = HttpResponse::new(429, "slow down").with_retry_after("7");
        assert_eq!(r.retry_after.as_deref(), Some("7"));
        assert_eq!(r.body, "slow down");
    }

    #[test]
    fn user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("seismic/"));
    }

    #[test]
    fn reqwest_transport_builds() {
        assert!(ReqwestTransport::new().is_ok());
    }
}
