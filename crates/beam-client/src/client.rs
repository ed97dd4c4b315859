//! The Beam API client.

use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderValue;
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::address::{build_address, QueryParams};
use crate::config::{ClientConfig, UrlKind, Urls};
use crate::error::HttpError;
use crate::provider::Provider;
use crate::request::{RequestOptions, RequestSpec};
use crate::response::{RawResponse, Response};
use crate::runner::{DefaultRequestRunner, RequestRunner};
use crate::user_agent::build_user_agent;

/// Stores the base URLs and the authentication provider, and dispatches
/// requests to the API.
pub struct Client {
    urls: Urls,
    user_agent: HeaderValue,
    provider: Option<Arc<dyn Provider>>,
    runner: Box<dyn RequestRunner>,
}

impl Client {
    /// Create a client with default configuration and the default runner.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration and the default runner.
    pub fn with_config(config: ClientConfig) -> Result<Self, HttpError> {
        let runner = DefaultRequestRunner::with_config(&config.runner)?;
        Ok(Self::with_runner(config, runner))
    }

    /// Create a client that dispatches through `runner`.
    pub fn with_runner(config: ClientConfig, runner: impl RequestRunner + 'static) -> Self {
        let agent = build_user_agent(config.host_user_agent.as_deref());
        // The agent must be visible ASCII; otherwise fall back to the native
        // agent.
        let user_agent = [agent, build_user_agent(None)]
            .into_iter()
            .filter_map(|agent| HeaderValue::try_from(agent).ok())
            .find(|value| value.to_str().is_ok())
            .unwrap_or_else(|| HeaderValue::from_static("BeamClient"));

        Self {
            urls: config.urls,
            user_agent,
            provider: None,
            runner: Box::new(runner),
        }
    }

    /// Set the API or public base URL.
    pub fn set_url(&mut self, kind: UrlKind, url: impl Into<String>) -> &mut Self {
        self.urls.set(kind, url);
        self
    }

    /// Both base URLs.
    pub fn urls(&self) -> &Urls {
        &self.urls
    }

    /// Base URL of the given kind.
    pub fn url(&self, kind: UrlKind) -> &str {
        self.urls.get(kind)
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        self.user_agent.to_str().unwrap_or_default()
    }

    /// Join `path` onto `base`; see [`build_address`].
    pub fn build_address(&self, base: &str, path: &str, query: Option<&QueryParams>) -> String {
        build_address(base, path, query)
    }

    /// Attach an authentication provider, replacing any previous one.
    pub fn use_provider(&mut self, provider: Arc<dyn Provider>) -> &mut Self {
        self.provider = Some(provider);
        self
    }

    /// The attached provider, if any.
    pub fn provider(&self) -> Option<Arc<dyn Provider>> {
        self.provider.clone()
    }

    /// Detach the provider and return it.
    pub fn clear_provider(&mut self) -> Option<Arc<dyn Provider>> {
        self.provider.take()
    }

    /// Compose the request specification for a call.
    ///
    /// Precedence, highest first: the caller's `options`, the client defaults
    /// (method, URL joined onto the API base, `User-Agent`, JSON mode), then
    /// the provider's fields. Lower layers only fill what is still unset.
    pub fn compose(&self, method: Method, path: &str, options: Option<RequestOptions>) -> RequestSpec {
        let url = build_address(&self.urls.api, path, None);
        let mut spec = RequestSpec::new(method, url, &self.user_agent);

        if let Some(options) = options {
            spec.overlay(options);
        }
        if let Some(provider) = &self.provider {
            spec.fill(provider.request_options());
        }

        tracing::trace!(method = %spec.method, url = %spec.url, json = spec.json, "Composed request");
        spec
    }

    /// Run a request and return the undecoded response.
    ///
    /// If the runner fails and a provider is attached, the provider decides
    /// the outcome. Otherwise the runner's error is returned unchanged.
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        options: Option<RequestOptions>,
    ) -> Result<RawResponse, HttpError> {
        let spec = self.compose(method, path, options);

        match self.runner.run(&spec).await {
            Ok(response) => Ok(response),
            Err(err) => match &self.provider {
                Some(provider) => {
                    tracing::debug!(url = %spec.url, "Request failed, handing error to provider");
                    provider.handle_response_error(err, &spec).await
                }
                None => Err(err),
            },
        }
    }

    /// Run a request and decode the JSON body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: Option<RequestOptions>,
    ) -> Result<Response<T>, HttpError> {
        self.request_raw(method, path, options).await?.parse_json()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("urls", &self.urls)
            .field("user_agent", &self.user_agent)
            .field("provider", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}
