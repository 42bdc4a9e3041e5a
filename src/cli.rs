//! Command-line interface parsing for the WaniKani CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the configuration the client is built from.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::default_cache_dir;
use crate::config::{CacheTtls, ClientConfig, ConfigError, CACHE_DIR_ENV, TOKEN_ENV};

/// Default age after which `prune` deletes cache files
pub const DEFAULT_PRUNE_HOURS: u64 = 168;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The timestamp is not RFC 3339
    #[error("Invalid timestamp: '{0}'. Expected RFC 3339, e.g. 2024-01-31T12:00:00Z")]
    InvalidTimestamp(String),
}

/// WaniKani CLI - Query the WaniKani API with a local response cache
#[derive(Parser, Debug)]
#[command(name = "wanikani")]
#[command(about = "Query the WaniKani API with a local response cache")]
#[command(version)]
pub struct Cli {
    /// Personal access token
    #[arg(long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Directory holding cached responses
    #[arg(long, global = true, env = CACHE_DIR_ENV, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always fetch fresh data and leave the cache untouched
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Log requests and cache decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the user profile
    User,
    /// Show available lessons and reviews
    Summary,
    /// Show level and pending work, fetching user and summary concurrently
    Status,
    /// List subjects, or show one with --id
    Subjects {
        /// Only subjects changed after this RFC 3339 time
        #[arg(long, value_parser = parse_timestamp_arg)]
        updated_after: Option<DateTime<Utc>>,
        /// Fetch a single subject
        #[arg(long, conflicts_with = "updated_after")]
        id: Option<u64>,
    },
    /// List assignments
    Assignments {
        /// Only assignments changed after this RFC 3339 time
        #[arg(long, value_parser = parse_timestamp_arg)]
        updated_after: Option<DateTime<Utc>>,
    },
    /// List reviews
    Reviews {
        /// Only reviews changed after this RFC 3339 time
        #[arg(long, value_parser = parse_timestamp_arg)]
        updated_after: Option<DateTime<Utc>>,
    },
    /// List study materials
    StudyMaterials {
        /// Only study materials changed after this RFC 3339 time
        #[arg(long, value_parser = parse_timestamp_arg)]
        updated_after: Option<DateTime<Utc>>,
    },
    /// Delete cached responses older than the given age
    Prune {
        #[arg(long, default_value_t = DEFAULT_PRUNE_HOURS)]
        max_age_hours: u64,
    },
}

/// Parses an RFC 3339 timestamp argument.
///
/// # Arguments
/// * `s` - The timestamp string from CLI
///
/// # Returns
/// * `Ok(DateTime<Utc>)` if the string is a valid RFC 3339 time
/// * `Err(CliError::InvalidTimestamp)` otherwise
pub fn parse_timestamp_arg(s: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CliError::InvalidTimestamp(s.to_string()))
}

impl Cli {
    /// Whether the command talks to the API and therefore needs a token
    pub fn needs_token(&self) -> bool {
        !matches!(self.command, Command::Prune { .. })
    }

    /// The cache directory from `--cache-dir`/`WANIKANI_CACHE_DIR` or the
    /// platform default
    pub fn resolve_cache_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_dir().ok_or(ConfigError::NoCacheDir),
        }
    }

    /// Builds the client configuration from the parsed flags
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        Ok(ClientConfig::new(token).with_cache_dir(self.resolve_cache_dir()?))
    }

    /// TTLs to use: all zero with `--no-cache`, otherwise from the environment
    pub fn cache_ttls(&self) -> Result<CacheTtls, ConfigError> {
        if self.no_cache {
            Ok(CacheTtls::disabled())
        } else {
            CacheTtls::from_env()
        }
    }

    /// Maximum age for `prune`, if that is the command
    pub fn prune_max_age(&self) -> Option<Duration> {
        match self.command {
            Command::Prune { max_age_hours } => {
                Some(Duration::from_secs(max_age_hours.saturating_mul(60 * 60)))
            }
            _ => None,
        }
    }
}
