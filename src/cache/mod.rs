//! Cache module for storing API payloads to disk
//!
//! Responses are keyed by a fingerprint of the request and stored one file
//! per fingerprint. Freshness is judged by file age against the caller's TTL;
//! stored ETag/Last-Modified validators let the request layer revalidate
//! instead of re-downloading.

pub mod fingerprint;
mod store;

pub use fingerprint::{fingerprint, Fingerprint};
pub use store::{default_cache_dir, CacheEntry, CacheLookup, CacheStore};
