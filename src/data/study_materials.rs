//! `GET /study_materials`: the user's notes and synonyms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Endpoint, Resource, SubjectType};
use crate::error::ApiError;
use crate::request::ApiClient;

/// User-authored notes and synonyms attached to a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub subject_id: u64,
    pub subject_type: SubjectType,
    #[serde(default)]
    pub meaning_note: Option<String>,
    #[serde(default)]
    pub reading_note: Option<String>,
    #[serde(default)]
    pub meaning_synonyms: Vec<String>,
    #[serde(default)]
    pub hidden: bool,
}

/// Endpoint for study materials
#[derive(Debug, Clone, Copy)]
pub struct StudyMaterialsEndpoint<'a>(Endpoint<'a>);

impl<'a> StudyMaterialsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "study_materials", ttl))
    }

    /// Lists study materials, optionally only those changed after `updated_after`
    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<StudyMaterial>>, ApiError> {
        self.0.list(updated_after).await
    }

    /// Fetches one study material
    pub async fn get(self, id: u64) -> Result<StudyMaterial, ApiError> {
        self.0.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_study_material() {
        let json = r#"{
            "created_at": "2017-09-30T01:42:13.453291Z",
            "hidden": false,
            "meaning_note": "I like turtles",
            "meaning_synonyms": ["burn", "sizzle"],
            "reading_note": null,
            "subject_id": 2,
            "subject_type": "radical"
        }"#;
        let material: StudyMaterial =
            serde_json::from_str(json).expect("Failed to parse study material");

        assert_eq!(material.meaning_note.as_deref(), Some("I like turtles"));
        assert!(material.reading_note.is_none());
        assert_eq!(material.meaning_synonyms, vec!["burn", "sizzle"]);
    }
}
