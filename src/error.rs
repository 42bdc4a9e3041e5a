//! Error types for API requests
//!
//! Cache failures never show up here: the cache layer degrades to a miss and
//! the network path carries on. Everything below is surfaced to the caller.

use thiserror::Error;

/// Errors that can occur when requesting a resource from the API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a status was received (DNS, connect, TLS, body read)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}{}", message_suffix(.message))]
    Http {
        status: u16,
        url: String,
        message: Option<String>,
    },

    /// The server answered 304 but there is no cached payload to reuse
    #[error("cache miss on not-modified response for {url}")]
    CacheInconsistency { url: String },

    /// Response body or payload is not the JSON we expected
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// Response body is JSON but not a valid envelope
    #[error("invalid response envelope: {0}")]
    InvalidEnvelope(String),

    /// A caller-supplied header name or value is not valid HTTP
    #[error("invalid request header `{0}`")]
    InvalidHeader(String),

    /// Request URL could not be built
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the response arrived but had the wrong shape
    pub fn is_format_error(&self) -> bool {
        matches!(self, ApiError::Decode(_) | ApiError::InvalidEnvelope(_))
    }
}
