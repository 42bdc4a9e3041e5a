//! `GET /user`: the token owner's profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Endpoint;
use crate::error::ApiError;
use crate::request::ApiClient;

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub level: u32,
    pub profile_url: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub current_vacation_started_at: Option<DateTime<Utc>>,
    pub subscription: Subscription,
    /// Lesson and review preferences, kept as raw JSON
    #[serde(default)]
    pub preferences: serde_json::Value,
}

/// Subscription details reported with the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub active: bool,
    /// `"free"`, `"recurring"`, `"lifetime"` or `"unknown"`
    #[serde(rename = "type")]
    pub kind: String,
    pub max_level_granted: u32,
    #[serde(default)]
    pub period_ends_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the user is currently on vacation mode
    pub fn on_vacation(&self) -> bool {
        self.current_vacation_started_at.is_some()
    }
}

/// Endpoint for the authenticated user
#[derive(Debug, Clone, Copy)]
pub struct UserEndpoint<'a>(Endpoint<'a>);

impl<'a> UserEndpoint<'a> {
    pub fn new(api: &'a ApiClient, ttl: Duration) -> Self {
        Self(Endpoint::new(api, "user", ttl))
    }

    /// Fetches the user profile
    pub async fn get(self) -> Result<User, ApiError> {
        self.0.fetch().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_DATA: &str = r#"{
        "id": "5a6a5234-a392-4a87-8f3f-33342afe8a42",
        "username": "example_user",
        "level": 5,
        "profile_url": "https://www.wanikani.com/users/example_user",
        "started_at": "2012-05-11T00:52:18.958466Z",
        "current_vacation_started_at": null,
        "subscription": {
            "active": true,
            "type": "recurring",
            "max_level_granted": 60,
            "period_ends_at": "2018-12-11T13:32:19.485748Z"
        },
        "preferences": {
            "default_voice_actor_id": 1,
            "lessons_autoplay_audio": false
        }
    }"#;

    #[test]
    fn test_parse_user() {
        let user: User = serde_json::from_str(USER_DATA).expect("Failed to parse user");

        assert_eq!(user.username, "example_user");
        assert_eq!(user.level, 5);
        assert!(!user.on_vacation());
        assert_eq!(user.subscription.kind, "recurring");
        assert_eq!(user.subscription.max_level_granted, 60);
        assert_eq!(user.preferences["default_voice_actor_id"], 1);
    }

    #[test]
    fn test_parse_user_on_vacation() {
        let json = USER_DATA.replace(
            r#""current_vacation_started_at": null"#,
            r#""current_vacation_started_at": "2024-01-01T00:00:00.000000Z""#,
        );
        let user: User = serde_json::from_str(&json).expect("Failed to parse user");

        assert!(user.on_vacation());
    }
}
