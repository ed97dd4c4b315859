//! Error types for Beam API requests.

use std::time::Duration;

/// Boxed error raised by an authentication provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// HTTP errors.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("server error: {status}")]
    ServerError { status: u16, body: String },

    #[error("client error: {status}")]
    ClientError { status: u16, body: String },

    #[error("failed to decode response body (status {status}): {source}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode query string: {0}")]
    Query(#[source] serde_urlencoded::ser::Error),

    #[error("invalid header {name}")]
    InvalidHeader { name: String },

    #[error("authentication failed: {0}")]
    Auth(#[source] BoxError),
}

impl HttpError {
    /// Wrap a provider-specific failure.
    pub fn auth(err: impl Into<BoxError>) -> Self {
        HttpError::Auth(err.into())
    }

    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::RateLimited { .. } => Some(429),
            HttpError::ServerError { status, .. }
            | HttpError::ClientError { status, .. }
            | HttpError::Decode { status, .. } => Some(*status),
            HttpError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Request(e)
        }
    }
}
