//! Level progressions, resets, SRS definitions and voice actors
//!
//! These collections change rarely and are read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Endpoint, Resource};
use crate::error::ApiError;
use crate::request::ApiClient;

/// Timeline of one level for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgression {
    pub level: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub passed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub abandoned_at: Option<DateTime<Utc>>,
}

/// A level reset performed by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reset {
    pub created_at: DateTime<Utc>,
    pub original_level: u32,
    pub target_level: u32,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Definition of a spaced repetition system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacedRepetitionSystem {
    pub name: String,
    pub description: String,
    pub unlocking_stage_position: u32,
    pub starting_stage_position: u32,
    pub passing_stage_position: u32,
    pub burning_stage_position: u32,
    pub stages: Vec<SrsStage>,
}

/// One stage of a spaced repetition system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsStage {
    pub position: u32,
    /// Length of the interval, `None` for the locked and burned stages
    #[serde(default)]
    pub interval: Option<u64>,
    /// `"milliseconds"`, `"seconds"`, `"minutes"`, `"hours"`, `"days"` or `"weeks"`
    #[serde(default)]
    pub interval_unit: Option<String>,
}

impl SrsStage {
    /// The stage interval as a duration
    pub fn interval_duration(&self) -> Option<Duration> {
        let amount = self.interval?;
        let unit_secs = match self.interval_unit.as_deref()? {
            "milliseconds" => return Some(Duration::from_millis(amount)),
            "seconds" => 1,
            "minutes" => 60,
            "hours" => 3_600,
            "days" => 86_400,
            "weeks" => 604_800,
            _ => return None,
        };
        Some(Duration::from_secs(amount * unit_secs))
    }
}

/// A voice actor used for vocabulary audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceActor {
    pub name: String,
    pub gender: String,
    pub description: String,
}

/// Endpoint for level progressions
#[derive(Debug, Clone, Copy)]
pub struct LevelProgressionsEndpoint<'a>(Endpoint<'a>);

impl<'a> LevelProgressionsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "level_progressions", ttl))
    }

    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<LevelProgression>>, ApiError> {
        self.0.list(updated_after).await
    }
}

/// Endpoint for resets
#[derive(Debug, Clone, Copy)]
pub struct ResetsEndpoint<'a>(Endpoint<'a>);

impl<'a> ResetsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "resets", ttl))
    }

    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<Reset>>, ApiError> {
        self.0.list(updated_after).await
    }
}

/// Endpoint for spaced repetition systems
#[derive(Debug, Clone, Copy)]
pub struct SpacedRepetitionSystemsEndpoint<'a>(Endpoint<'a>);

impl<'a> SpacedRepetitionSystemsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "spaced_repetition_systems", ttl))
    }

    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<SpacedRepetitionSystem>>, ApiError> {
        self.0.list(updated_after).await
    }
}

/// Endpoint for voice actors
#[derive(Debug, Clone, Copy)]
pub struct VoiceActorsEndpoint<'a>(Endpoint<'a>);

impl<'a> VoiceActorsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "voice_actors", ttl))
    }

    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<VoiceActor>>, ApiError> {
        self.0.list(updated_after).await
    }
}
