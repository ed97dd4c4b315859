//! Request runners: the transport seam of the client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;

use crate::config::RunnerConfig;
use crate::error::HttpError;
use crate::request::{headers, RequestSpec};
use crate::response::RawResponse;

/// Executes a composed request.
#[async_trait]
pub trait RequestRunner: Send + Sync {
    /// Run the request. Failures include network errors, timeouts and
    /// whatever statuses the runner treats as errors.
    async fn run(&self, request: &RequestSpec) -> Result<RawResponse, HttpError>;
}

/// Build a configured `reqwest` client.
pub fn build_client(config: &RunnerConfig) -> Result<Client, HttpError> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(config.pool_max_idle_per_host);

    if config.gzip {
        builder = builder.gzip(true);
    }

    builder.build().map_err(HttpError::ClientBuild)
}

/// Runner backed by `reqwest`. Any non-2xx status is an error.
#[derive(Debug, Clone)]
pub struct DefaultRequestRunner {
    inner: Client,
}

impl DefaultRequestRunner {
    /// Create a runner with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(&RunnerConfig::default())
    }

    /// Create a runner with custom settings.
    pub fn with_config(config: &RunnerConfig) -> Result<Self, HttpError> {
        let inner = build_client(config)?;
        Ok(Self { inner })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(inner: Client) -> Self {
        Self { inner }
    }

    /// Get the inner reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    fn prepare(&self, request: &RequestSpec) -> reqwest::RequestBuilder {
        let mut builder = self
            .inner
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if let Some(query) = &request.query {
            builder = builder.query(query.pairs());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        if request.json {
            if !request.headers.contains_key(ACCEPT) {
                builder = builder.header(ACCEPT, HeaderValue::from_static(headers::CONTENT_TYPE_JSON));
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
        } else if let Some(body) = &request.body {
            builder = match body {
                Value::String(text) => builder.body(text.clone()),
                other => builder.body(other.to_string()),
            };
        }

        builder
    }

    /// Check response status and convert errors.
    pub async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, HttpError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(HttpError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();

        if status.is_server_error() {
            Err(HttpError::ServerError {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(HttpError::ClientError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl RequestRunner for DefaultRequestRunner {
    async fn run(&self, request: &RequestSpec) -> Result<RawResponse, HttpError> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = self.prepare(request).send().await.map_err(HttpError::from)?;
        tracing::debug!(status = %response.status(), url = %request.url, "Received response");

        let response = Self::check_response(response).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(HttpError::from)?;

        Ok(RawResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::USER_AGENT;
    use reqwest::Method;

    fn spec(method: Method) -> RequestSpec {
        RequestSpec::new(
            method,
            "http://localhost/api/v1/chats/5",
            &HeaderValue::from_static("BeamClient/test"),
        )
    }

    #[test]
    fn test_runner_creation() {
        assert!(DefaultRequestRunner::new().is_ok());

        let config = RunnerConfig {
            connect_timeout_ms: 500,
            request_timeout_ms: 1500,
            pool_max_idle_per_host: 1,
            gzip: false,
        };
        assert!(DefaultRequestRunner::with_config(&config).is_ok());
    }

    #[test]
    fn test_prepare_json_request() {
        let runner = DefaultRequestRunner::new().unwrap();
        let mut spec = spec(Method::POST);
        spec.body = Some(serde_json::json!({ "message": "hi" }));
        spec.query = Some([("page", "1")].into());

        let request = runner.prepare(&spec).build().unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost/api/v1/chats/5?page=1");
        assert_eq!(request.headers().get(USER_AGENT).unwrap(), "BeamClient/test");
        assert_eq!(request.headers().get(ACCEPT).unwrap(), "application/json");
        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()).unwrap(),
            br#"{"message":"hi"}"#
        );
    }

    #[test]
    fn test_prepare_text_request() {
        let runner = DefaultRequestRunner::new().unwrap();
        let mut spec = spec(Method::PUT);
        spec.json = false;
        spec.body = Some(Value::String("plain".to_string()));
        spec.timeout = Some(Duration::from_secs(3));

        let request = runner.prepare(&spec).build().unwrap();
        assert!(request.headers().get(ACCEPT).is_none());
        assert_eq!(request.body().and_then(|b| b.as_bytes()).unwrap(), b"plain");
        assert_eq!(request.timeout(), Some(&Duration::from_secs(3)));
    }

    #[test]
    fn test_prepare_keeps_caller_accept() {
        let runner = DefaultRequestRunner::new().unwrap();
        let mut spec = spec(Method::GET);
        spec.headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));

        let request = runner.prepare(&spec).build().unwrap();
        assert_eq!(request.headers().get(ACCEPT).unwrap(), "text/plain");
        assert_eq!(request.headers().get_all(ACCEPT).iter().count(), 1);
    }

    #[test]
    fn test_prepare_text_request_serializes_non_string_body() {
        let runner = DefaultRequestRunner::new().unwrap();
        let mut spec = spec(Method::POST);
        spec.json = false;
        spec.body = Some(serde_json::json!({ "a": 1 }));

        let request = runner.prepare(&spec).build().unwrap();
        assert_eq!(request.body().and_then(|b| b.as_bytes()).unwrap(), br#"{"a":1}"#);
        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.headers().get(ACCEPT).is_none());
    }
}
