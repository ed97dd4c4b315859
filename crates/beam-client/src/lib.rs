//! HTTP client for the Beam REST API.
//!
//! [`Client`] composes requests from the caller's options, its own defaults
//! and an optional authentication [`Provider`], then dispatches them through a
//! [`RequestRunner`]. The default runner is backed by `reqwest`.
//!
//! ```no_run
//! use beam_client::{Client, Method, RequestOptions, Response};
//!
//! # async fn run() -> Result<(), beam_client::HttpError> {
//! let client = Client::new()?;
//! let users: Response<serde_json::Value> = client
//!     .request(
//!         Method::GET,
//!         "chats/5/users",
//!         Some(RequestOptions::new().query([("page", "0"), ("limit", "50")])),
//!     )
//!     .await?;
//! println!("{}", users.body);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod request;
pub mod response;
pub mod runner;
pub mod user_agent;

pub use address::{build_address, QueryParams};
pub use client::Client;
pub use config::{ClientConfig, ConfigError, RunnerConfig, UrlKind, Urls};
pub use error::{BoxError, HttpError};
pub use provider::Provider;
pub use request::{headers, RequestOptions, RequestSpec};
pub use response::{RawResponse, Response};
pub use runner::{build_client, DefaultRequestRunner, RequestRunner};

pub use reqwest::{Method, StatusCode};
