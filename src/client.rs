//! Top-level WaniKani client
//!
//! Wires the request layer to every endpoint, handing each one the TTL
//! configured for its resource kind.

use std::time::Duration;

use thiserror::Error;

use crate::config::{CacheTtls, ClientConfig, ConfigError, ResourceKind};
use crate::data::{
    AssignmentsEndpoint, LevelProgressionsEndpoint, ResetsEndpoint, ReviewStatisticsEndpoint,
    ReviewsEndpoint, SpacedRepetitionSystemsEndpoint, StudyMaterialsEndpoint, SubjectsEndpoint,
    SummaryEndpoint, UserEndpoint, VoiceActorsEndpoint,
};
use crate::error::ApiError;
use crate::request::ApiClient;

/// Errors that can occur while constructing a client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Client for the WaniKani v2 API
#[derive(Debug, Clone)]
pub struct WaniKaniClient {
    api: ApiClient,
    ttls: CacheTtls,
}

impl WaniKaniClient {
    /// Creates a client from explicit configuration
    pub fn new(config: ClientConfig, ttls: CacheTtls) -> Result<Self, ApiError> {
        Ok(Self::with_api(ApiClient::new(config)?, ttls))
    }

    /// Creates a client around an existing request layer
    pub fn with_api(api: ApiClient, ttls: CacheTtls) -> Self {
        Self { api, ttls }
    }

    /// Creates a client from `WANIKANI_*` environment variables
    pub fn from_env() -> Result<Self, ClientError> {
        let config = ClientConfig::from_env()?;
        let ttls = CacheTtls::from_env()?;
        Ok(Self::new(config, ttls)?)
    }

    /// The underlying request layer
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The TTL mapping in use
    pub fn ttls(&self) -> &CacheTtls {
        &self.ttls
    }

    /// Deletes cache files older than `max_age`
    pub fn prune_cache(&self, max_age: Duration) -> usize {
        self.api.prune_cache(max_age)
    }

    fn ttl(&self, kind: ResourceKind) -> Duration {
        self.ttls.ttl_for(kind)
    }

    pub fn user(&self) -> UserEndpoint<'_> {
        UserEndpoint::new(&self.api, self.ttl(ResourceKind::User))
    }

    pub fn summary(&self) -> SummaryEndpoint<'_> {
        SummaryEndpoint::new(&self.api, self.ttl(ResourceKind::Summary))
    }

    pub fn subjects(&self) -> SubjectsEndpoint<'_> {
        SubjectsEndpoint::new(&self.api, self.ttl(ResourceKind::Subjects))
    }

    pub fn assignments(&self) -> AssignmentsEndpoint<'_> {
        AssignmentsEndpoint::new(&self.api, self.ttl(ResourceKind::Assignments))
    }

    pub fn reviews(&self) -> ReviewsEndpoint<'_> {
        ReviewsEndpoint::new(&self.api, self.ttl(ResourceKind::Reviews))
    }

    pub fn review_statistics(&self) -> ReviewStatisticsEndpoint<'_> {
        ReviewStatisticsEndpoint::new(&self.api, self.ttl(ResourceKind::ReviewStatistics))
    }

    pub fn study_materials(&self) -> StudyMaterialsEndpoint<'_> {
        StudyMaterialsEndpoint::new(&self.api, self.ttl(ResourceKind::StudyMaterials))
    }

    pub fn level_progressions(&self) -> LevelProgressionsEndpoint<'_> {
        LevelProgressionsEndpoint::new(&self.api, self.ttl(ResourceKind::LevelProgressions))
    }

    pub fn resets(&self) -> ResetsEndpoint<'_> {
        ResetsEndpoint::new(&self.api, self.ttl(ResourceKind::Resets))
    }

    pub fn spaced_repetition_systems(&self) -> SpacedRepetitionSystemsEndpoint<'_> {
        SpacedRepetitionSystemsEndpoint::new(
            &self.api,
            self.ttl(ResourceKind::SpacedRepetitionSystems),
        )
    }

    pub fn voice_actors(&self) -> VoiceActorsEndpoint<'_> {
        VoiceActorsEndpoint::new(&self.api, self.ttl(ResourceKind::VoiceActors))
    }
}
