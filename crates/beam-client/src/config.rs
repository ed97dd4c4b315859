//! Client configuration.
//!
//! Configuration can be built in code or loaded from a YAML file. Missing
//! fields fall back to their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://beam.pro/api/v1";

/// Default public site URL.
pub const DEFAULT_PUBLIC_URL: &str = "https://beam.pro";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },
}

/// Which base URL to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlKind {
    Api,
    Public,
}

/// Base URLs for the API and the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Urls {
    pub api: String,
    pub public: String,
}

impl Default for Urls {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_URL.to_string(),
            public: DEFAULT_PUBLIC_URL.to_string(),
        }
    }
}

impl Urls {
    /// Base URL of the given kind.
    pub fn get(&self, kind: UrlKind) -> &str {
        match kind {
            UrlKind::Api => &self.api,
            UrlKind::Public => &self.public,
        }
    }

    /// Replace the base URL of the given kind.
    pub fn set(&mut self, kind: UrlKind, url: impl Into<String>) {
        match kind {
            UrlKind::Api => self.api = url.into(),
            UrlKind::Public => self.public = url.into(),
        }
    }
}

/// Settings for the default `reqwest` runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Enable gzip decompression.
    pub gzip: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            pool_max_idle_per_host: 10,
            gzip: true,
        }
    }
}

impl RunnerConfig {
    /// Connection timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub urls: Urls,
    /// User agent of the embedding host (webview, wrapping application).
    /// When set it prefixes the library identifier.
    pub host_user_agent: Option<String>,
    pub runner: RunnerConfig,
}

impl ClientConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file, returning defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No client config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Load from a YAML file that must exist.
    pub fn load_required(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Self::load(path)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.urls.api.trim().is_empty() || self.urls.public.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "urls.api and urls.public must not be empty".to_string(),
            });
        }

        if self.runner.connect_timeout_ms == 0 || self.runner.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "runner timeouts must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
