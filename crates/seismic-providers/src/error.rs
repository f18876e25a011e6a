//! Error types for earthquake provider operations.
//!
//! Every failure of the pipeline is a [`ProviderError`] tagged with a
//! [`ProviderErrorCode`]. The code decides how a caller should present the
//! failure: configuration and input problems are the caller's fault (400
//! class), everything coming from the data source is a gateway failure (502
//! class).

use std::fmt;

use seismic_core::QueryError;
use thiserror::Error;

/// Prefix used when surfacing upstream failures to end users.
const UPSTREAM_PREFIX: &str = "Failed to fetch earthquake data";

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The requested provider identifier is not registered.
    UnknownProvider,
    /// Query parameters are malformed or out of range.
    Validation,
    /// The upstream answered with an HTTP error status.
    Upstream,
    /// The request never produced a response: connection failure, timeout.
    Network,
    /// The upstream answered 2xx but the body is not JSON.
    InvalidResponse,
}

impl ProviderErrorCode {
    /// Returns a stable snake_case name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownProvider => "unknown_provider",
            Self::Validation => "validation_error",
            Self::Upstream => "upstream_error",
            Self::Network => "network_error",
            Self::InvalidResponse => "invalid_response",
        }
    }

    /// Returns true for errors caused by the caller's input or configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownProvider | Self::Validation)
    }

    /// HTTP status class a REST layer should answer with.
    pub fn http_status(&self) -> u16 {
        if self.is_client_error() { 400 } else { 502 }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while resolving a provider or fetching from it.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Provider that generated this error (e.g. "usgs").
    provider: Option<String>,
    /// Upstream HTTP status, for [`ProviderErrorCode::Upstream`].
    status: Option<u16>,
    /// Upstream response body, for [`ProviderErrorCode::Upstream`].
    body: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            status: None,
            body: None,
            source: None,
        }
    }

    /// Creates an unknown-provider error listing the supported identifiers.
    pub fn unknown_provider(name: &str, supported: &[&str]) -> Self {
        Self::new(
            ProviderErrorCode::UnknownProvider,
            format!(
                "Unknown provider {}. Supported providers: {}",
                name,
                supported.join(", ")
            ),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Validation, message)
    }

    /// Creates an upstream error carrying the HTTP status and response body.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut err = Self::new(
            ProviderErrorCode::Upstream,
            format!("upstream returned HTTP {}", status),
        );
        err.status = Some(status);
        err.body = Some(body);
        err
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Network, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Upstream HTTP status, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Upstream response body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// HTTP status class a REST layer should answer with (400 or 502).
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Message suitable for end users.
    ///
    /// Caller errors are shown as-is; upstream failures get a fixed prefix.
    pub fn public_message(&self) -> String {
        if self.code.is_client_error() {
            self.message.clone()
        } else {
            format!("{}: {}", UPSTREAM_PREFIX, self.message)
        }
    }

    /// JSON error body, `{"error": "<message>"}`.
    pub fn error_body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.public_message() })
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<QueryError> for ProviderError {
    fn from(err: QueryError) -> Self {
        Self::validation(err.to_string()).with_source(err)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
