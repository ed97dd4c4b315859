//! Authentication provider capability.

use async_trait::async_trait;

use crate::error::HttpError;
use crate::request::{RequestOptions, RequestSpec};
use crate::response::RawResponse;

/// Supplies credentials for outgoing requests and gets the first chance to
/// recover from failed ones.
///
/// Implementations are attached with [`Client::use_provider`](crate::Client::use_provider).
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use beam_client::{HttpError, Provider, RequestOptions};
///
/// struct StaticToken(String);
///
/// #[async_trait]
/// impl Provider for StaticToken {
///     fn request_options(&self) -> RequestOptions {
///         RequestOptions::new()
///             .bearer_auth(&self.0)
///             .unwrap_or_default()
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fields merged into every request. They never override the caller's
    /// options or the client defaults.
    fn request_options(&self) -> RequestOptions {
        RequestOptions::default()
    }

    /// Called when the runner fails. Return a substitute response to recover
    /// (e.g. after refreshing credentials), or an error to fail the call.
    async fn handle_response_error(
        &self,
        error: HttpError,
        _request: &RequestSpec,
    ) -> Result<RawResponse, HttpError> {
        Err(error)
    }
}
