//! Typed endpoint wrappers for the WaniKani v2 API
//!
//! Each submodule holds the data shapes for one resource family and a thin
//! endpoint struct that calls into [`ApiClient::request`] with the resource's
//! path and cache TTL. Only the fields this crate uses are modelled; unknown
//! fields are ignored.

pub mod assignments;
pub mod progression;
pub mod reviews;
pub mod study_materials;
pub mod subjects;
pub mod summary;
pub mod user;

pub use assignments::{Assignment, AssignmentsEndpoint};
pub use progression::{
    LevelProgression, LevelProgressionsEndpoint, Reset, ResetsEndpoint, SpacedRepetitionSystem,
    SpacedRepetitionSystemsEndpoint, SrsStage, VoiceActor, VoiceActorsEndpoint,
};
pub use reviews::{Review, ReviewStatistic, ReviewStatisticsEndpoint, ReviewsEndpoint};
pub use study_materials::{StudyMaterial, StudyMaterialsEndpoint};
pub use subjects::{Meaning, Reading, Subject, SubjectsEndpoint};
pub use summary::{Summary, SummaryBucket, SummaryEndpoint};
pub use user::{Subscription, User, UserEndpoint};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ApiError;
use crate::request::{ApiClient, RequestOptions};

/// One record of a collection, with its identity and payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<T> {
    /// Unique identifier within the resource type
    pub id: u64,
    /// Object kind, e.g. `"kanji"` or `"assignment"`
    pub object: String,
    /// Canonical URL of the record
    pub url: String,
    /// When the record last changed
    #[serde(default)]
    pub data_updated_at: Option<DateTime<Utc>>,
    /// The record's own data
    pub data: T,
}

/// Kind of subject a record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Radical,
    Kanji,
    Vocabulary,
    KanaVocabulary,
}

/// Path and TTL shared by every call of one endpoint
#[derive(Debug, Clone, Copy)]
struct Endpoint<'a> {
    api: &'a ApiClient,
    path: &'static str,
    ttl: Duration,
}

impl<'a> Endpoint<'a> {
    fn new(api: &'a ApiClient, path: &'static str, ttl: Duration) -> Self {
        Self { api, path, ttl }
    }

    /// Fetches a singleton resource such as `user` or `summary`
    async fn fetch<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.api
            .request(self.path, &RequestOptions::default(), self.ttl, None)
            .await
    }

    /// Fetches the first page of a collection
    async fn list<T: DeserializeOwned>(
        &self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<T>>, ApiError> {
        self.api
            .request(self.path, &RequestOptions::default(), self.ttl, updated_after)
            .await
    }

    /// Fetches one record of a collection by id
    async fn get<T: DeserializeOwned>(&self, id: u64) -> Result<T, ApiError> {
        let path = format!("{}/{}", self.path, id);
        self.api
            .request(&path, &RequestOptions::default(), self.ttl, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_deserializes_collection_item() {
        let json = r#"{
            "id": 1,
            "object": "radical",
            "url": "https://api.wanikani.com/v2/subjects/1",
            "data_updated_at": "2024-06-11T19:34:11.219871Z",
            "data": {"level": 1}
        }"#;

        let resource: Resource<serde_json::Value> =
            serde_json::from_str(json).expect("Failed to parse resource");

        assert_eq!(resource.id, 1);
        assert_eq!(resource.object, "radical");
        assert!(resource.data_updated_at.is_some());
        assert_eq!(resource.data["level"], 1);
    }

    #[test]
    fn test_subject_type_names() {
        let parsed: Vec<SubjectType> =
            serde_json::from_str(r#"["radical","kanji","vocabulary","kana_vocabulary"]"#)
                .expect("Failed to parse subject types");

        assert_eq!(
            parsed,
            vec![
                SubjectType::Radical,
                SubjectType::Kanji,
                SubjectType::Vocabulary,
                SubjectType::KanaVocabulary
            ]
        );
    }
}
