//! Client configuration
//!
//! `ClientConfig` holds everything the request layer needs (base URL, API
//! revision, token, cache directory) and is passed in explicitly; nothing in
//! the request layer reads the environment. `CacheTtls` maps each resource
//! kind to the TTL its endpoint passes to the request layer.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cache::default_cache_dir;

/// Base URL of the v2 API
pub const DEFAULT_BASE_URL: &str = "https://api.wanikani.com/v2/";

/// API revision sent in the `Wanikani-Revision` header
pub const API_REVISION: &str = "20170710";

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "WANIKANI_API_TOKEN";

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "WANIKANI_CACHE_DIR";

/// Environment variable overriding the shared default TTL, in milliseconds
pub const DEFAULT_TTL_ENV: &str = "WANIKANI_CACHE_TTL_MS";

const HOUR: Duration = Duration::from_secs(60 * 60);

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API token was supplied
    #[error("missing API token: set {} or pass --token", TOKEN_ENV)]
    MissingToken,

    /// No cache directory could be determined
    #[error("cannot determine a cache directory: set {}", CACHE_DIR_ENV)]
    NoCacheDir,

    /// A TTL override is not a whole number of milliseconds
    #[error("invalid TTL in {var}: '{value}' (expected milliseconds)")]
    InvalidTtl { var: String, value: String },
}

/// Connection and cache settings for the request layer
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL request paths are joined onto
    pub base_url: String,
    /// Value of the `Wanikani-Revision` header
    pub revision: String,
    /// Personal access token sent as a bearer token
    pub token: String,
    /// Directory holding cache files
    pub cache_dir: PathBuf,
}

impl ClientConfig {
    /// Creates a configuration for the public API using the default cache directory
    ///
    /// Falls back to a `wanikani-cache` directory under the system temp
    /// directory when no user cache directory exists.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            revision: API_REVISION.to_string(),
            token: token.into(),
            cache_dir: default_cache_dir()
                .unwrap_or_else(|| std::env::temp_dir().join("wanikani-cache")),
        }
    }

    /// Loads configuration from `WANIKANI_API_TOKEN` and `WANIKANI_CACHE_DIR`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through a variable lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let cache_dir = match lookup(CACHE_DIR_ENV).filter(|d| !d.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_cache_dir().ok_or(ConfigError::NoCacheDir)?,
        };

        Ok(Self::new(token.trim()).with_cache_dir(cache_dir))
    }

    /// Overrides the base URL (e.g. to point at a test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the cache directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }
}

/// Resource categories with independently configurable cache TTLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Subjects,
    Assignments,
    Reviews,
    ReviewStatistics,
    StudyMaterials,
    Summary,
    User,
    LevelProgressions,
    Resets,
    SpacedRepetitionSystems,
    VoiceActors,
}

impl ResourceKind {
    /// Every resource kind
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Subjects,
        ResourceKind::Assignments,
        ResourceKind::Reviews,
        ResourceKind::ReviewStatistics,
        ResourceKind::StudyMaterials,
        ResourceKind::Summary,
        ResourceKind::User,
        ResourceKind::LevelProgressions,
        ResourceKind::Resets,
        ResourceKind::SpacedRepetitionSystems,
        ResourceKind::VoiceActors,
    ];

    /// Kebab-case name, e.g. `"study-materials"`
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Subjects => "subjects",
            ResourceKind::Assignments => "assignments",
            ResourceKind::Reviews => "reviews",
            ResourceKind::ReviewStatistics => "review-statistics",
            ResourceKind::StudyMaterials => "study-materials",
            ResourceKind::Summary => "summary",
            ResourceKind::User => "user",
            ResourceKind::LevelProgressions => "level-progressions",
            ResourceKind::Resets => "resets",
            ResourceKind::SpacedRepetitionSystems => "spaced-repetition-systems",
            ResourceKind::VoiceActors => "voice-actors",
        }
    }

    /// Environment variable overriding this kind's TTL
    ///
    /// e.g. `WANIKANI_CACHE_TTL_STUDY_MATERIALS_MS`
    pub fn env_var(&self) -> String {
        format!(
            "WANIKANI_CACHE_TTL_{}_MS",
            self.as_str().replace('-', "_").to_uppercase()
        )
    }

    /// TTL used when neither an override nor a changed default applies
    fn builtin_ttl(&self) -> Option<Duration> {
        match self {
            ResourceKind::Subjects
            | ResourceKind::SpacedRepetitionSystems
            | ResourceKind::VoiceActors => Some(24 * HOUR),
            ResourceKind::Summary => Some(Duration::from_secs(15 * 60)),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache TTL for each resource kind
///
/// Lookup order: explicit override, then the kind's built-in TTL, then the
/// shared default.
#[derive(Debug, Clone)]
pub struct CacheTtls {
    default: Duration,
    overrides: HashMap<ResourceKind, Duration>,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            default: HOUR,
            overrides: HashMap::new(),
        }
    }
}

impl CacheTtls {
    /// Every kind gets a zero TTL, so nothing is read from or written to the cache
    pub fn disabled() -> Self {
        let mut ttls = Self::default().with_default(Duration::ZERO);
        for kind in ResourceKind::ALL {
            ttls = ttls.with_override(kind, Duration::ZERO);
        }
        ttls
    }

    /// Loads TTL overrides from `WANIKANI_CACHE_TTL_MS` and `WANIKANI_CACHE_TTL_<KIND>_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads TTL overrides through a variable lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut ttls = Self::default();

        if let Some(value) = lookup(DEFAULT_TTL_ENV) {
            ttls = ttls.with_default(parse_millis(DEFAULT_TTL_ENV, &value)?);
        }
        for kind in ResourceKind::ALL {
            let var = kind.env_var();
            if let Some(value) = lookup(&var) {
                ttls = ttls.with_override(kind, parse_millis(&var, &value)?);
            }
        }

        Ok(ttls)
    }

    /// Sets the shared default TTL
    pub fn with_default(mut self, ttl: Duration) -> Self {
        self.default = ttl;
        self
    }

    /// Sets the TTL for one resource kind
    pub fn with_override(mut self, kind: ResourceKind, ttl: Duration) -> Self {
        self.overrides.insert(kind, ttl);
        self
    }

    /// The shared default TTL
    pub fn default_ttl(&self) -> Duration {
        self.default
    }

    /// TTL for a resource kind
    pub fn ttl_for(&self, kind: ResourceKind) -> Duration {
        self.overrides
            .get(&kind)
            .copied()
            .or_else(|| kind.builtin_ttl())
            .unwrap_or(self.default)
    }
}

fn parse_millis(var: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidTtl {
            var: var.to_string(),
            value: value.to_string(),
        })
}
