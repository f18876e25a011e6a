//! Client error types.

use std::fmt;

use seismic_providers::{ProviderError, ProviderErrorCode};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Provider resolution, validation or fetch error.
    Provider(ProviderError),
    /// IO error.
    Io(std::io::Error),
    /// Output could not be rendered.
    Render(String),
}

impl ClientError {
    /// Process exit code: 2 for caller mistakes, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Provider(err) if err.code().is_client_error() => 2,
            Self::Config(_) => 2,
            _ => 1,
        }
    }

    /// Message shown to the user.
    pub fn public_message(&self) -> String {
        match self {
            Self::Provider(err) => err.public_message(),
            other => other.to_string(),
        }
    }

    /// JSON error body, `{"error": "<message>"}`.
    pub fn error_body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.public_message() })
    }

    pub fn provider_code(&self) -> Option<ProviderErrorCode> {
        match self {
            Self::Provider(err) => Some(err.code()),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(err) => write!(f, "{}", err.public_message()),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Render(msg) => write!(f, "render error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}
