//! WaniKani API client library
//!
//! Requests go through [`ApiClient::request`], which fingerprints each call,
//! revalidates cached responses with `If-None-Match`/`If-Modified-Since`, and
//! decodes the `data` member of the API's response envelope. The typed
//! endpoints in [`data`] and the [`WaniKaniClient`] façade sit on top.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod request;

pub use client::{ClientError, WaniKaniClient};
pub use config::{CacheTtls, ClientConfig, ConfigError, ResourceKind};
pub use error::ApiError;
pub use request::{ApiClient, RequestOptions};
