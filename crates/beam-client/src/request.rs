//! Request options and the composed request specification.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::address::QueryParams;
use crate::error::HttpError;

/// Common HTTP headers.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Partial request description supplied by callers and providers.
///
/// Every field is optional; unset fields are filled from the client defaults
/// when the request is composed.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub url: Option<String>,
    pub headers: HeaderMap,
    /// Send and expect JSON.
    pub json: Option<bool>,
    pub body: Option<Value>,
    pub query: Option<QueryParams>,
    /// Per-request timeout handed to the runner.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self, HttpError> {
        let invalid = || HttpError::InvalidHeader {
            name: name.as_ref().to_string(),
        };
        let header_name = HeaderName::try_from(name.as_ref()).map_err(|_| invalid())?;
        let header_value = HeaderValue::try_from(value.as_ref()).map_err(|_| invalid())?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Add bearer token authorization.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Result<Self, HttpError> {
        let mut value = HeaderValue::try_from(format!("Bearer {}", token.as_ref())).map_err(|_| {
            HttpError::InvalidHeader {
                name: AUTHORIZATION.to_string(),
            }
        })?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Set the JSON body.
    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set a plain text body and turn JSON mode off.
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Value::String(body.into()));
        self.json = Some(false);
        self
    }

    /// Turn JSON mode on or off.
    pub fn json(mut self, enabled: bool) -> Self {
        self.json = Some(enabled);
        self
    }

    /// Set the query parameters.
    pub fn query(mut self, query: impl Into<QueryParams>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Override the full target URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Fully composed description of an outgoing call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub json: bool,
    pub body: Option<Value>,
    pub query: Option<QueryParams>,
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    /// Defaults every request starts from.
    pub fn new(method: Method, url: impl Into<String>, user_agent: &HeaderValue) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent.clone());

        Self {
            method,
            url: url.into(),
            headers,
            json: true,
            body: None,
            query: None,
            timeout: None,
        }
    }

    /// Apply options that take precedence over the current values.
    pub fn overlay(&mut self, options: RequestOptions) {
        if let Some(method) = options.method {
            self.method = method;
        }
        if let Some(url) = options.url {
            self.url = url;
        }
        if let Some(json) = options.json {
            self.json = json;
        }
        if options.timeout.is_some() {
            self.timeout = options.timeout;
        }

        let mut headers = options.headers;
        fill_headers(&mut headers, std::mem::take(&mut self.headers));
        self.headers = headers;

        if let Some(mut body) = options.body {
            if let Some(current) = self.body.take() {
                fill_value(&mut body, current);
            }
            self.body = Some(body);
        }

        if let Some(mut query) = options.query {
            if let Some(current) = self.query.take() {
                query.fill_missing(current);
            }
            self.query = Some(query);
        }
    }

    /// Fill only what is still unset; existing values win.
    ///
    /// Method, URL and JSON mode are always set, so these options can only
    /// contribute headers, body keys, query pairs and a timeout.
    pub fn fill(&mut self, options: RequestOptions) {
        fill_headers(&mut self.headers, options.headers);

        if let Some(other) = options.body {
            if let Some(body) = &mut self.body {
                fill_value(body, other);
            } else {
                self.body = Some(other);
            }
        }

        if let Some(other) = options.query {
            if let Some(query) = &mut self.query {
                query.fill_missing(other);
            } else {
                self.query = Some(other);
            }
        }

        if self.timeout.is_none() {
            self.timeout = options.timeout;
        }
    }

    /// Header value as text, if present and visible ASCII.
    pub fn header(&self, name: impl reqwest::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Copy every header from `source` whose name `target` does not have yet.
/// Multi-valued headers are copied whole.
fn fill_headers(target: &mut HeaderMap, source: HeaderMap) {
    let mut current: Option<HeaderName> = None;
    for (name, value) in source {
        // `None` name means another value of the previous header.
        if let Some(name) = name {
            current = if target.contains_key(&name) { None } else { Some(name) };
        }
        if let Some(name) = &current {
            target.append(name.clone(), value);
        }
    }
}

/// Recursively add keys from `source` that `target` is missing. Non-object
/// values in `target` are kept as they are.
fn fill_value(target: &mut Value, source: Value) {
    if let (Value::Object(target), Value::Object(source)) = (target, source) {
        for (key, value) in source {
            match target.get_mut(&key) {
                Some(existing) => fill_value(existing, value),
                None => {
                    target.insert(key, value);
                }
            }
        }
    }
}
