//! `GET /assignments`: the user's progress on each subject

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Endpoint, Resource, SubjectType};
use crate::error::ApiError;
use crate::request::ApiClient;

/// SRS stage at which an item counts as burned
const BURNED_STAGE: u32 = 9;

/// Progress on one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub subject_id: u64,
    pub subject_type: SubjectType,
    pub srs_stage: u32,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub passed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub burned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resurrected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hidden: bool,
}

impl Assignment {
    /// Whether a review is due at `now`
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        self.started_at.is_some() && self.available_at.is_some_and(|at| at <= now)
    }

    pub fn is_burned(&self) -> bool {
        self.srs_stage >= BURNED_STAGE
    }
}

/// Endpoint for assignments
#[derive(Debug, Clone, Copy)]
pub struct AssignmentsEndpoint<'a>(Endpoint<'a>);

impl<'a> AssignmentsEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "assignments", ttl))
    }

    /// Lists assignments, optionally only those changed after `updated_after`
    pub async fn list(
        self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Resource<Assignment>>, ApiError> {
        self.0.list(updated_after).await
    }

    /// Fetches one assignment
    pub async fn get(self, id: u64) -> Result<Assignment, ApiError> {
        self.0.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ASSIGNMENT_DATA: &str = r#"{
        "created_at": "2017-09-05T23:38:10.695133Z",
        "subject_id": 8761,
        "subject_type": "radical",
        "srs_stage": 8,
        "unlocked_at": "2017-09-05T23:38:10.695133Z",
        "started_at": "2017-09-05T23:41:28.980679Z",
        "passed_at": "2017-09-07T17:14:14.491889Z",
        "burned_at": null,
        "available_at": "2018-02-27T00:00:00.000000Z",
        "resurrected_at": null,
        "hidden": false
    }"#;

    #[test]
    fn test_parse_assignment() {
        let assignment: Assignment =
            serde_json::from_str(ASSIGNMENT_DATA).expect("Failed to parse assignment");

        assert_eq!(assignment.subject_id, 8761);
        assert_eq!(assignment.subject_type, SubjectType::Radical);
        assert_eq!(assignment.srs_stage, 8);
        assert!(!assignment.is_burned());
        assert!(assignment.burned_at.is_none());
    }

    #[test]
    fn test_availability() {
        let assignment: Assignment =
            serde_json::from_str(ASSIGNMENT_DATA).expect("Failed to parse assignment");

        let before = Utc.with_ymd_and_hms(2018, 2, 26, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2018, 2, 27, 0, 0, 0).unwrap();
        assert!(!assignment.is_available_at(before));
        assert!(assignment.is_available_at(after));

        let unstarted = Assignment {
            started_at: None,
            ..assignment
        };
        assert!(!unstarted.is_available_at(after));
    }
}
