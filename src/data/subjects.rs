//! `GET /subjects`: radicals, kanji and vocabulary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Endpoint, Resource};
use crate::error::ApiError;
use crate::request::ApiClient;

/// A radical, kanji or vocabulary item
///
/// Fields specific to one subject type (component ids, context sentences,
/// pronunciation audio, ...) are not modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub level: u32,
    pub slug: String,
    /// Missing for radicals that only exist as images
    #[serde(default)]
    pub characters: Option<String>,
    pub meanings: Vec<Meaning>,
    /// Radicals have no readings
    #[serde(default)]
    pub readings: Vec<Reading>,
    pub document_url: String,
    pub lesson_position: u32,
    pub spaced_repetition_system_id: u64,
    #[serde(default)]
    pub hidden_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meaning {
    pub meaning: String,
    pub primary: bool,
    pub accepted_answer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub reading: String,
    pub primary: bool,
    pub accepted_answer: bool,
    /// Kanji only: `"onyomi"`, `"kunyomi"` or `"nanori"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Subject {
    /// The primary meaning, if one is marked
    pub fn primary_meaning(&self) -> Option<&str> {
        self.meanings
            .iter()
            .find(|m| m.primary)
            .map(|m| m.meaning.as_str())
    }

    /// The primary reading, if the subject has one
    pub fn primary_reading(&self) -> Option<&str> {
        self.readings
            .iter()
            .find(|r| r.primary)
            .map(|r| r.reading.as_str())
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden_at.is_some()
    }
}

/// Endpoint for subjects
#[derive(Debug, Clone, Copy)]
pub struct SubjectsEndpoint<'a>(Endpoint<'a>);

impl<'a> SubjectsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "subjects", ttl))
    }

    /// Lists subjects, optionally only those changed after `updated_after`
    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<Subject>>, ApiError> {
        self.0.list(updated_after).await
    }

    /// Fetches one subject
    pub async fn get(self, id: u64) -> Result<Subject, ApiError> {
        self.0.get(id).await
    }
}
