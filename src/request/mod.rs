//! Request layer: the single entry point endpoint wrappers call into
//!
//! `ApiClient::request` turns (path, options, TTL) into a typed payload:
//! build the URL, fingerprint the request, run it through the conditional
//! executor, and decode the envelope's `data` into the caller's type.

mod conditional;
pub mod envelope;

pub use conditional::ConditionalExecutor;
pub use envelope::Envelope;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use crate::cache::{fingerprint, CacheStore};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Query parameter collection endpoints use to filter by modification time
const UPDATED_AFTER_PARAM: &str = "updated_after";

/// Per-call request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method (GET unless set)
    pub method: Method,
    /// Caller headers; only string values are sent and fingerprinted
    pub headers: Map<String, Value>,
    /// Raw request body
    pub body: Option<String>,
}

impl RequestOptions {
    /// Sets the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a caller header
    ///
    /// Values other than strings are accepted but ignored when the request is
    /// sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Client for the API's request/cache layer
///
/// Cloning is cheap and clones share the HTTP connection pool and cache
/// directory, so independent calls can run concurrently.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    token: String,
    executor: ConditionalExecutor,
}

impl ApiClient {
    /// Creates a client with a default HTTP client
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), config)
    }

    /// Creates a client with a custom HTTP client
    ///
    /// No request timeout is set by default; pass a client built with
    /// `reqwest::Client::builder().timeout(..)` to bound request time.
    pub fn with_client(client: Client, config: ClientConfig) -> Result<Self, ApiError> {
        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let store = CacheStore::new(config.cache_dir);
        Ok(Self {
            base_url,
            executor: ConditionalExecutor::new(client, store, config.token.clone(), config.revision),
            token: config.token,
        })
    }

    /// Base URL every request path is joined onto
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The cache store backing this client
    pub fn cache(&self) -> &CacheStore {
        self.executor.store()
    }

    /// Deletes cache files older than `max_age`, returning how many were removed
    pub fn prune_cache(&self, max_age: Duration) -> usize {
        self.cache().prune(max_age)
    }

    /// Builds the request URL for `path`, with an optional `updated_after` filter
    pub fn url_for(
        &self,
        path: &str,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if let Some(after) = updated_after {
            url.query_pairs_mut().append_pair(
                UPDATED_AFTER_PARAM,
                &after.to_rfc3339_opts(SecondsFormat::Millis, true),
            );
        }
        Ok(url)
    }

    /// Fetches the resource at `path` and decodes its payload
    ///
    /// # Arguments
    /// * `path` - Path relative to the base URL, e.g. `"subjects"` or `"user"`
    /// * `options` - Method, caller headers and body
    /// * `ttl` - How long a cached payload may be revalidated instead of
    ///   refetched; zero bypasses the cache completely
    /// * `updated_after` - Only return records modified after this time
    ///
    /// # Returns
    /// * `Ok(T)` - The envelope's `data`, decoded
    /// * `Err(ApiError)` - See [`ApiError`] for the failure modes
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
        ttl: Duration,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<T, ApiError> {
        let url = self.url_for(path, updated_after)?;
        let key = fingerprint(url.as_str(), options, &self.token);

        let data = self.executor.execute(url.as_str(), &key, options, ttl).await?;
        Ok(serde_json::from_value(data)?)
    }
}
