//! `GET /summary`: lessons and reviews available now and over the next day

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Endpoint;
use crate::error::ApiError;
use crate::request::ApiClient;

/// Lesson and review schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub lessons: Vec<SummaryBucket>,
    #[serde(default)]
    pub next_reviews_at: Option<DateTime<Utc>>,
    pub reviews: Vec<SummaryBucket>,
}

/// Subjects becoming available at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBucket {
    pub available_at: DateTime<Utc>,
    pub subject_ids: Vec<u64>,
}

impl Summary {
    /// Number of reviews available at `now`
    pub fn reviews_available_at(&self, now: DateTime<Utc>) -> usize {
        count_available(&self.reviews, now)
    }

    /// Number of lessons available at `now`
    pub fn lessons_available_at(&self, now: DateTime<Utc>) -> usize {
        count_available(&self.lessons, now)
    }
}

fn count_available(buckets: &[SummaryBucket], now: DateTime<Utc>) -> usize {
    buckets
        .iter()
        .filter(|b| b.available_at <= now)
        .map(|b| b.subject_ids.len())
        .sum()
}

/// Endpoint for the lesson/review summary
#[derive(Debug, Clone, Copy)]
pub struct SummaryEndpoint<'a>(Endpoint<'a>);

impl<'a> SummaryEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "summary", ttl))
    }

    /// Fetches the summary
    pub async fn get(self) -> Result<Summary, ApiError> {
        self.0.fetch().await
    }
}
