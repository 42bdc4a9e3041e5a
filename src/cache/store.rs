//! Cache store for persisting API payloads to disk
//!
//! Provides a `CacheStore` that keeps one JSON file per request fingerprint.
//! The file's modification time is the only freshness signal; nothing about
//! the TTL is stored inside the file.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use super::fingerprint::Fingerprint;

/// A cached payload plus the validators needed to revalidate it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The envelope's `data` field as received from the API
    pub data: Value,
    /// ETag response header, sent back as `If-None-Match`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Last-Modified response header, sent back as `If-Modified-Since`
    #[serde(
        rename = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<String>,
}

impl CacheEntry {
    /// Creates an entry without validators
    pub fn new(data: Value) -> Self {
        Self {
            data,
            etag: None,
            last_modified: None,
        }
    }

    /// Sets the ETag validator
    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }

    /// Sets the Last-Modified validator
    pub fn with_last_modified(mut self, last_modified: Option<String>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Whether revalidation headers can be built from this entry
    pub fn has_validators(&self) -> bool {
        self.etag.is_some() || self.last_modified.is_some()
    }
}

/// Outcome of looking up a fingerprint
///
/// `CacheStore::read` collapses everything except `Hit` into "absent"; the
/// other variants exist so the reason can be logged.
#[derive(Debug)]
pub enum CacheLookup {
    /// A fresh, well-formed entry
    Hit(CacheEntry),
    /// No file for this fingerprint
    Miss,
    /// The file is at least `max_age` old
    Expired,
    /// The file exists but could not be read or failed validation
    Corrupt(String),
}

impl CacheLookup {
    /// Converts the lookup into the entry, if there is a usable one
    pub fn into_entry(self) -> Option<CacheEntry> {
        match self {
            CacheLookup::Hit(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Stores cached API payloads as JSON files in a single directory
///
/// Every failure inside the store is advisory: reads degrade to "absent",
/// writes report an error the caller is free to ignore, and pruning never
/// fails.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a store in the given directory
    ///
    /// The directory does not need to exist yet; it is created on first write.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Creates a store in the XDG-compliant cache directory
    ///
    /// Uses `~/.cache/wanikani/` on Linux, or equivalent on other platforms.
    /// Returns `None` if the cache directory cannot be determined.
    pub fn default_location() -> Option<Self> {
        default_cache_dir().map(Self::new)
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the cache file for a fingerprint
    pub fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.cache_dir.join(fingerprint.file_name())
    }

    /// Reads a fresh entry, or `None` for any missing, stale, or broken file
    pub fn read(&self, fingerprint: &Fingerprint, max_age: Duration) -> Option<CacheEntry> {
        self.lookup(fingerprint, max_age).into_entry()
    }

    /// Looks up an entry and reports why it is unusable when it is
    pub fn lookup(&self, fingerprint: &Fingerprint, max_age: Duration) -> CacheLookup {
        let path = self.path_for(fingerprint);

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return CacheLookup::Miss,
            Err(e) => return CacheLookup::Corrupt(e.to_string()),
        };

        match file_age(&metadata) {
            Some(age) if age < max_age => {}
            Some(_) => return CacheLookup::Expired,
            None => return CacheLookup::Corrupt("unknown modification time".to_string()),
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            // Deleted between stat and read
            Err(e) if e.kind() == io::ErrorKind::NotFound => return CacheLookup::Miss,
            Err(e) => return CacheLookup::Corrupt(e.to_string()),
        };

        match parse_entry(&content) {
            Ok(entry) => CacheLookup::Hit(entry),
            Err(reason) => CacheLookup::Corrupt(reason),
        }
    }

    /// Persists an entry, replacing any previous file for the fingerprint
    ///
    /// The directory is recreated before every write since it may have been
    /// removed from outside.
    pub fn write(&self, fingerprint: &Fingerprint, entry: &CacheEntry) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let json = serde_json::to_string(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(self.path_for(fingerprint), json)
    }

    /// Deletes every cache file older than `max_age`
    ///
    /// Non-regular files are skipped. Failures to stat or delete a single file
    /// are treated as "already gone", and an unreadable directory is logged
    /// and ignored.
    ///
    /// # Returns
    /// The number of files removed
    pub fn prune(&self, max_age: Duration) -> usize {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.cache_dir.display(), error = %e, "cannot read cache directory, skipping prune");
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let expired = file_age(&metadata).is_some_and(|age| age > max_age);
            if expired && fs::remove_file(entry.path()).is_ok() {
                debug!(path = %entry.path().display(), "pruned cache file");
                removed += 1;
            }
        }

        removed
    }
}

/// Returns the default cache directory (`~/.cache/wanikani/` on Linux)
pub fn default_cache_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "wanikani")?;
    Some(project_dirs.cache_dir().to_path_buf())
}

/// Time since the file was last written
///
/// A modification time in the future counts as age zero.
fn file_age(metadata: &fs::Metadata) -> Option<Duration> {
    let modified = metadata.modified().ok()?;
    Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    )
}

/// Parses and validates a cache file
///
/// A valid file is a JSON object with a `data` key; `etag` and
/// `lastModified` are optional but must be strings when present.
fn parse_entry(content: &str) -> Result<CacheEntry, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "cache file is not a JSON object".to_string())?;

    if !object.contains_key("data") {
        return Err("missing `data`".to_string());
    }
    for key in ["etag", "lastModified"] {
        match object.get(key) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => return Err(format!("`{}` is not a string", key)),
        }
    }

    serde_json::from_value(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fingerprint;
    use crate::request::RequestOptions;
    use serde_json::json;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(86_400);

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::new(temp_dir.path());
        (store, temp_dir)
    }

    fn key(path: &str) -> Fingerprint {
        fingerprint(path, &RequestOptions::default(), "test-token")
    }

    fn backdate(path: &Path, by: Duration) {
        let file = fs::File::options()
            .write(true)
            .open(path)
            .expect("Should open cache file");
        file.set_modified(SystemTime::now() - by)
            .expect("Should set modification time");
    }

    #[test]
    fn test_write_creates_file_named_after_fingerprint() {
        let (store, temp_dir) = create_test_store();
        let fp = key("/v2/user");

        store
            .write(&fp, &CacheEntry::new(json!({"username": "koichi"})))
            .expect("Write should succeed");

        let expected_path = temp_dir.path().join(format!("{}.json", fp));
        assert!(expected_path.exists(), "Cache file should exist");

        let content = fs::read_to_string(&expected_path).expect("Should read file");
        let on_disk: Value = serde_json::from_str(&content).expect("Should be JSON");
        assert_eq!(on_disk, json!({"data": {"username": "koichi"}}));
    }

    #[test]
    fn test_roundtrip_preserves_payload_and_validators() {
        let (store, _temp_dir) = create_test_store();
        let fp = key("/v2/subjects");
        let entry = CacheEntry::new(json!([{"id": 1, "object": "radical"}]))
            .with_etag(Some("W/\"abc123\"".to_string()))
            .with_last_modified(Some("Tue, 01 Oct 2024 10:00:00 GMT".to_string()));

        store.write(&fp, &entry).expect("Write should succeed");

        let read = store.read(&fp, DAY).expect("Should read fresh entry");
        assert_eq!(read, entry);
    }

    #[test]
    fn test_validators_use_camel_case_on_disk() {
        let (store, _temp_dir) = create_test_store();
        let fp = key("/v2/summary");
        let entry = CacheEntry::new(json!({}))
            .with_last_modified(Some("Tue, 01 Oct 2024 10:00:00 GMT".to_string()));

        store.write(&fp, &entry).expect("Write should succeed");

        let content = fs::read_to_string(store.path_for(&fp)).expect("Should read file");
        assert!(content.contains("\"lastModified\""));
        assert!(!content.contains("\"etag\""));
    }

    #[test]
    fn test_read_returns_none_for_missing_file() {
        let (store, _temp_dir) = create_test_store();

        assert!(store.read(&key("/v2/nothing"), DAY).is_none());
        assert!(matches!(store.lookup(&key("/v2/nothing"), DAY), CacheLookup::Miss));
    }

    #[test]
    fn test_read_treats_old_file_as_absent() {
        let (store, _temp_dir) = create_test_store();
        let fp = key("/v2/assignments");
        store
            .write(&fp, &CacheEntry::new(json!([])))
            .expect("Write should succeed");

        backdate(&store.path_for(&fp), Duration::from_secs(120));

        assert!(store.read(&fp, Duration::from_secs(60)).is_none());
        assert!(matches!(
            store.lookup(&fp, Duration::from_secs(60)),
            CacheLookup::Expired
        ));
        assert!(store.read(&fp, Duration::from_secs(600)).is_some());
    }

    #[test]
    fn test_zero_max_age_is_always_expired() {
        let (store, _temp_dir) = create_test_store();
        let fp = key("/v2/reviews");
        store
            .write(&fp, &CacheEntry::new(json!([])))
            .expect("Write should succeed");

        assert!(store.read(&fp, Duration::ZERO).is_none());
    }

    #[test]
    fn test_read_treats_unparsable_file_as_absent() {
        let (store, temp_dir) = create_test_store();
        let fp = key("/v2/user");
        fs::write(temp_dir.path().join(fp.file_name()), "{not json").expect("Should write");

        assert!(store.read(&fp, DAY).is_none());
        assert!(matches!(store.lookup(&fp, DAY), CacheLookup::Corrupt(_)));
    }

    #[test]
    fn test_read_rejects_file_without_data() {
        let (store, temp_dir) = create_test_store();
        let fp = key("/v2/user");
        fs::write(temp_dir.path().join(fp.file_name()), r#"{"etag": "\"x\""}"#)
            .expect("Should write");

        assert!(store.read(&fp, DAY).is_none());
    }

    #[test]
    fn test_read_rejects_non_string_validators() {
        let (store, temp_dir) = create_test_store();
        let fp = key("/v2/user");
        fs::write(
            temp_dir.path().join(fp.file_name()),
            r#"{"data": {}, "lastModified": 12}"#,
        )
        .expect("Should write");

        assert!(store.read(&fp, DAY).is_none());
    }

    #[test]
    fn test_read_accepts_null_data() {
        let (store, temp_dir) = create_test_store();
        let fp = key("/v2/user");
        fs::write(temp_dir.path().join(fp.file_name()), r#"{"data": null}"#)
            .expect("Should write");

        let entry = store.read(&fp, DAY).expect("null data is still data");
        assert_eq!(entry.data, Value::Null);
        assert!(!entry.has_validators());
    }

    #[test]
    fn test_write_recreates_removed_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache");
        let store = CacheStore::new(nested_path.clone());
        let fp = key("/v2/user");

        store
            .write(&fp, &CacheEntry::new(json!(1)))
            .expect("Write should succeed");
        fs::remove_dir_all(&nested_path).expect("Should remove directory");
        store
            .write(&fp, &CacheEntry::new(json!(2)))
            .expect("Write should succeed again");

        assert_eq!(store.read(&fp, DAY).map(|e| e.data), Some(json!(2)));
    }

    #[test]
    fn test_write_fails_when_directory_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").expect("Should write");
        let store = CacheStore::new(blocker);

        assert!(store.write(&key("/v2/user"), &CacheEntry::new(json!({}))).is_err());
    }

    #[test]
    fn test_overwrite_existing_entry() {
        let (store, _temp_dir) = create_test_store();
        let fp = key("/v2/summary");

        store
            .write(&fp, &CacheEntry::new(json!({"v": 1})))
            .expect("First write should succeed");
        store
            .write(&fp, &CacheEntry::new(json!({"v": 2})))
            .expect("Second write should succeed");

        assert_eq!(store.read(&fp, DAY).map(|e| e.data), Some(json!({"v": 2})));
    }

    #[test]
    fn test_prune_removes_only_old_files() {
        let (store, temp_dir) = create_test_store();
        let old = key("/v2/old");
        let new = key("/v2/new");
        store.write(&old, &CacheEntry::new(json!(1))).expect("Write should succeed");
        store.write(&new, &CacheEntry::new(json!(2))).expect("Write should succeed");
        backdate(&store.path_for(&old), Duration::from_secs(7200));

        let removed = store.prune(Duration::from_secs(3600));

        assert_eq!(removed, 1);
        assert!(!store.path_for(&old).exists());
        assert!(store.path_for(&new).exists());
        assert!(temp_dir.path().exists());
    }

    #[test]
    fn test_prune_skips_directories() {
        let (store, temp_dir) = create_test_store();
        let sub = temp_dir.path().join("subdir");
        fs::create_dir(&sub).expect("Should create subdir");

        assert_eq!(store.prune(Duration::ZERO), 0);
        assert!(sub.exists());
    }

    #[test]
    fn test_prune_missing_directory_does_not_fail() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::new(temp_dir.path().join("does-not-exist"));

        assert_eq!(store.prune(Duration::ZERO), 0);
    }

    #[test]
    fn test_default_location_is_xdg_compliant() {
        if let Some(store) = CacheStore::default_location() {
            let path_str = store.dir().to_string_lossy();
            assert!(path_str.contains("wanikani"), "Cache path should contain project name");
        }
        // Passes if no home directory is available (e.g. in CI)
    }
}
