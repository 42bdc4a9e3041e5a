//! Request fingerprints used as cache keys
//!
//! A fingerprint is a SHA-256 digest over the parts of a request that decide
//! what the server sends back: path and query, method, string-valued caller
//! headers, body, and a truncated hash of the API token. Two logically
//! identical requests always map to the same cache file, and cache entries
//! for different tokens never mix.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use url::Url;

use crate::request::RequestOptions;

/// Origin used to reduce absolute and relative URLs to path + query
const DUMMY_ORIGIN: &str = "http://fingerprint.invalid/";

/// Number of hex characters of the token digest mixed into the fingerprint
const TOKEN_DIGEST_LEN: usize = 16;

/// Deterministic identifier for a logical request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hex digest of the request
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the cache file holding this request's entry
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical shape hashed into the fingerprint
///
/// Field order is fixed by the struct and headers are pre-sorted, so the
/// serialized form only depends on request content.
#[derive(Serialize)]
struct RequestShape<'a> {
    url: String,
    method: &'a str,
    headers: Vec<(String, &'a str)>,
    body: Option<&'a str>,
    credential: String,
}

/// Computes the fingerprint for a request
///
/// # Arguments
/// * `url` - Request URL, absolute or relative; only path and query count
/// * `options` - Method, caller headers and body
/// * `token` - API token; only a truncated digest of it is used
pub fn fingerprint(url: &str, options: &RequestOptions, token: &str) -> Fingerprint {
    let shape = RequestShape {
        url: normalize_url(url),
        method: options.method.as_str(),
        headers: string_headers(&options.headers),
        body: options.body.as_deref(),
        credential: token_digest(token),
    };

    // Serializing plain strings and vectors cannot fail
    let canonical = serde_json::to_vec(&shape).unwrap_or_default();
    Fingerprint(hex::encode(Sha256::digest(&canonical)))
}

/// Reduces a URL to its path and query by resolving it against a fixed origin
fn normalize_url(url: &str) -> String {
    let resolved = Url::parse(DUMMY_ORIGIN).and_then(|base| base.join(url));
    match resolved {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// Keeps string-valued headers only, with lowercased names in sorted order
fn string_headers(headers: &serde_json::Map<String, Value>) -> Vec<(String, &str)> {
    let mut filtered: Vec<(String, &str)> = headers
        .iter()
        .filter_map(|(name, value)| value.as_str().map(|v| (name.to_ascii_lowercase(), v)))
        .collect();
    filtered.sort();
    filtered
}

fn token_digest(token: &str) -> String {
    let digest = hex::encode(Sha256::digest(token.as_bytes()));
    digest[..TOKEN_DIGEST_LEN].to_string()
}
