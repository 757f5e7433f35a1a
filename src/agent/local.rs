use async_trait::async_trait;
use tracing::debug;

use super::rules;
use crate::kernel::fallback::FallbackSupplier;
use crate::kernel::request::{ActionRequest, LearnRequest, ReasonRequest};
use crate::payload::{Activity, ActionPlan, Decision, LearningRecord, Venue, Weather};
use crate::services::backend::{StageBackend, StageError};

const SOURCE_NAME: &str = "Local Agent";

/// In-process backend: fixed world data plus the rule engine in `rules`.
#[derive(Debug, Clone)]
pub struct LocalAgent {
    weather: Weather,
    venues: Vec<Venue>,
    itinerary: Vec<Activity>,
    /// 0.0 - 1.0. None = unknown, energy rules skipped.
    energy_level: Option<f64>,
}

impl Default for LocalAgent {
    fn default() -> Self {
        Self {
            weather: FallbackSupplier::weather(),
            venues: FallbackSupplier::venues(),
            itinerary: FallbackSupplier::itinerary(),
            energy_level: None,
        }
    }
}

impl LocalAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_venues(mut self, venues: Vec<Venue>) -> Self {
        self.venues = venues;
        self
    }

    pub fn with_itinerary(mut self, itinerary: Vec<Activity>) -> Self {
        self.itinerary = itinerary;
        self
    }

    pub fn with_energy_level(mut self, energy_level: f64) -> Self {
        self.energy_level = Some(energy_level.clamp(0.0, 1.0));
        self
    }
}

#[async_trait]
impl StageBackend for LocalAgent {
    async fn weather(&self, location: &str) -> Result<Weather, StageError> {
        debug!("Local weather lookup for {}", location);
        let mut weather = self.weather.clone();
        if weather.data_source.is_none() {
            weather.data_source = Some(SOURCE_NAME.to_string());
        }
        Ok(weather)
    }

    async fn venues(&self, location: &str, _preferences: &str) -> Result<Vec<Venue>, StageError> {
        debug!("Local venue lookup for {}", location);
        Ok(self.venues.clone())
    }

    async fn itinerary(&self, _traveler: &str) -> Result<Vec<Activity>, StageError> {
        Ok(self.itinerary.clone())
    }

    async fn reason(&self, request: &ReasonRequest) -> Result<Decision, StageError> {
        let decision = rules::assess(request, self.energy_level);
        debug!("Local reasoning flagged {} activities", decision.unsafe_activities.len());
        Ok(decision)
    }

    async fn act(&self, request: &ActionRequest) -> Result<ActionPlan, StageError> {
        Ok(rules::adapt(request))
    }

    async fn learn(&self, request: &LearnRequest) -> Result<LearningRecord, StageError> {
        Ok(rules::learn(request))
    }
}
