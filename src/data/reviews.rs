//! `GET /reviews` and `GET /review_statistics`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Endpoint, Resource, SubjectType};
use crate::error::ApiError;
use crate::request::ApiClient;

/// A completed review session for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub created_at: DateTime<Utc>,
    pub assignment_id: u64,
    pub subject_id: u64,
    pub spaced_repetition_system_id: u64,
    pub starting_srs_stage: u32,
    pub ending_srs_stage: u32,
    pub incorrect_meaning_answers: u32,
    pub incorrect_reading_answers: u32,
}

impl Review {
    /// Whether both meaning and reading were answered correctly first time
    pub fn is_correct(&self) -> bool {
        self.incorrect_meaning_answers == 0 && self.incorrect_reading_answers == 0
    }
}

/// Cumulative answer statistics for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStatistic {
    pub subject_id: u64,
    pub subject_type: SubjectType,
    pub meaning_correct: u32,
    pub meaning_incorrect: u32,
    pub meaning_max_streak: u32,
    pub meaning_current_streak: u32,
    pub reading_correct: u32,
    pub reading_incorrect: u32,
    pub reading_max_streak: u32,
    pub reading_current_streak: u32,
    pub percentage_correct: u32,
    #[serde(default)]
    pub hidden: bool,
}

/// Endpoint for reviews
#[derive(Debug, Clone, Copy)]
pub struct ReviewsEndpoint<'a>(Endpoint<'a>);

impl<'a> ReviewsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "reviews", ttl))
    }

    /// Lists reviews, optionally only those changed after `updated_after`
    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<Review>>, ApiError> {
        self.0.list(updated_after).await
    }

    /// Fetches one review
    pub async fn get(self, id: u64) -> Result<Review, ApiError> {
        self.0.get(id).await
    }
}

/// Endpoint for review statistics
#[derive(Debug, Clone, Copy)]
pub struct ReviewStatisticsEndpoint<'a>(Endpoint<'a>);

impl<'a> ReviewStatisticsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "review_statistics", ttl))
    }

    /// Lists review statistics, optionally only those changed after `updated_after`
    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<ReviewStatistic>>, ApiError> {
        self.0.list(updated_after).await
    }

    /// Fetches the statistics record with the given id
    pub async fn get(self, id: u64) -> Result<ReviewStatistic, ApiError> {
        self.0.get(id).await
    }
}
