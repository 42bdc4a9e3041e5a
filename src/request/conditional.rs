//! Conditional request execution
//!
//! Each call moves through the same states:
//!
//! 1. TTL is zero: skip the cache entirely and go to the network.
//! 2. TTL is positive: look the fingerprint up in the cache store. A hit
//!    contributes `If-None-Match` / `If-Modified-Since`; the network call is
//!    still always made.
//! 3. Send the request with auth, revision and content-type headers, caller
//!    headers layered on top.
//! 4. Resolve: 304 reuses the cached payload, 2xx unwraps the envelope and
//!    refreshes the cache, anything else is an error.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, ETAG, IF_MODIFIED_SINCE,
    IF_NONE_MATCH, LAST_MODIFIED,
};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::envelope::Envelope;
use super::RequestOptions;
use crate::cache::{CacheEntry, CacheLookup, CacheStore, Fingerprint};
use crate::error::ApiError;

/// Header carrying the API revision the client was written against
const REVISION_HEADER: &str = "Wanikani-Revision";

/// Issues requests and reconciles their outcome with the cache store
#[derive(Debug, Clone)]
pub struct ConditionalExecutor {
    client: Client,
    store: CacheStore,
    token: String,
    revision: String,
}

impl ConditionalExecutor {
    /// Creates an executor sending `token` and `revision` on every request
    pub fn new(
        client: Client,
        store: CacheStore,
        token: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            token: token.into(),
            revision: revision.into(),
        }
    }

    /// The cache store backing this executor
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Fetches `url` and returns the envelope's `data`
    ///
    /// # Arguments
    /// * `url` - Absolute request URL
    /// * `fingerprint` - Cache key for this request
    /// * `options` - Method, caller headers and body
    /// * `ttl` - Maximum age of a cache entry; zero disables the cache
    ///
    /// # Returns
    /// * `Ok(Value)` - Fresh payload, or the cached one on 304
    /// * `Err(ApiError)` - Transport failure, error status, malformed body,
    ///   or a 304 with nothing in the cache
    pub async fn execute(
        &self,
        url: &str,
        fingerprint: &Fingerprint,
        options: &RequestOptions,
        ttl: Duration,
    ) -> Result<Value, ApiError> {
        let cached = if ttl.is_zero() {
            None
        } else {
            self.cached_entry(fingerprint, ttl)
        };

        let mut headers = self.base_headers(options)?;
        if let Some(entry) = &cached {
            add_validators(&mut headers, entry);
        }

        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        debug!(method = %options.method, url, revalidating = cached.is_some(), "sending request");
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            return match cached {
                Some(entry) => {
                    debug!(url, "not modified, using cached payload");
                    Ok(entry.data)
                }
                None => Err(ApiError::CacheInconsistency {
                    url: url.to_string(),
                }),
            };
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| error_message(&body));
            return Err(ApiError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        let etag = header_string(response.headers(), &ETAG);
        let last_modified = header_string(response.headers(), &LAST_MODIFIED);
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        let data = Envelope::from_value(body)?.into_data();

        if ttl.is_zero() {
            return Ok(data);
        }

        let entry = CacheEntry::new(data)
            .with_etag(etag)
            .with_last_modified(last_modified);
        if let Err(e) = self.store.write(fingerprint, &entry) {
            warn!(url, error = %e, "failed to write cache entry");
        }
        Ok(entry.data)
    }

    /// Reads a usable cache entry, logging why there isn't one
    fn cached_entry(&self, fingerprint: &Fingerprint, ttl: Duration) -> Option<CacheEntry> {
        match self.store.lookup(fingerprint, ttl) {
            CacheLookup::Hit(entry) => Some(entry),
            CacheLookup::Miss => {
                debug!(%fingerprint, "cache miss");
                None
            }
            CacheLookup::Expired => {
                debug!(%fingerprint, "cache entry expired");
                None
            }
            CacheLookup::Corrupt(reason) => {
                warn!(%fingerprint, reason = %reason, "ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Fixed headers plus string-valued caller headers, which take precedence
    fn base_headers(&self, options: &RequestOptions) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ApiError::InvalidHeader(AUTHORIZATION.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        let revision = HeaderValue::from_str(&self.revision)
            .map_err(|_| ApiError::InvalidHeader(REVISION_HEADER.to_string()))?;
        headers.insert(HeaderName::from_static("wanikani-revision"), revision);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let Some(value) = value.as_str() else {
                continue;
            };
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

/// Attaches revalidation headers for whichever validators the entry carries
fn add_validators(headers: &mut HeaderMap, entry: &CacheEntry) {
    if let Some(etag) = entry.etag.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
        headers.insert(IF_NONE_MATCH, etag);
    }
    if let Some(since) = entry
        .last_modified
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
    {
        headers.insert(IF_MODIFIED_SINCE, since);
    }
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Pulls the `error` message out of an API error body, if it has one
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(String::from)
}
