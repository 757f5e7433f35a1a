use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::kernel::fallback::FallbackSupplier;
use crate::kernel::request::{ActionRequest, LearnRequest, ReasonRequest, StageRequest};
use crate::payload::{
    Activity, ActionPlan, Decision, LearningRecord, Location, PerceptionPayload, StagePayload,
    Venue, Weather,
};

/// "Stage data unavailable", by cause. Always recovered by the fallback literal.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for StageError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            StageError::Status(status.as_u16())
        } else if e.is_decode() {
            StageError::Malformed(e.to_string())
        } else {
            StageError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StageError {
    fn from(e: serde_json::Error) -> Self {
        StageError::Malformed(e.to_string())
    }
}

impl From<std::io::Error> for StageError {
    fn from(e: std::io::Error) -> Self {
        StageError::Transport(e.to_string())
    }
}

/// The boundary calls consumed by the stage controller.
#[async_trait]
pub trait StageBackend: Send + Sync + 'static {
    async fn weather(&self, location: &str) -> Result<Weather, StageError>;

    async fn venues(&self, location: &str, preferences: &str) -> Result<Vec<Venue>, StageError>;

    /// The traveler's current plan for the day.
    async fn itinerary(&self, traveler: &str) -> Result<Vec<Activity>, StageError>;

    async fn reason(&self, request: &ReasonRequest) -> Result<Decision, StageError>;

    async fn act(&self, request: &ActionRequest) -> Result<ActionPlan, StageError>;

    async fn learn(&self, request: &LearnRequest) -> Result<LearningRecord, StageError>;
}

async fn bounded<T, F>(call: F, timeout: Option<Duration>) -> Result<T, StageError>
where
    F: Future<Output = Result<T, StageError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(StageError::Timeout(limit))),
        None => call.await,
    }
}

/// Runs one stage request against the backend.
///
/// Perception's three lookups run concurrently and fall back independently;
/// only when all three fail is the whole stage reported as unavailable.
pub async fn fulfil<B>(backend: &B, request: &StageRequest, timeout: Option<Duration>) -> Result<StagePayload, StageError>
where
    B: StageBackend + ?Sized,
{
    match request {
        StageRequest::Perception { user, .. } => {
            let (weather, venues, itinerary) = tokio::join!(
                bounded(backend.weather(user.location()), timeout),
                bounded(backend.venues(user.location(), user.preferences()), timeout),
                bounded(backend.itinerary(user.name()), timeout),
            );

            if let (Err(e), Err(_), Err(_)) = (&weather, &venues, &itinerary) {
                return Err(StageError::Transport(format!("all perception lookups failed ({})", e)));
            }

            let weather = weather.unwrap_or_else(|e| {
                warn!("Weather lookup failed: {}, using fallback", e);
                FallbackSupplier::weather()
            });
            let venues = venues.unwrap_or_else(|e| {
                warn!("Venue lookup failed: {}, using fallback", e);
                FallbackSupplier::venues()
            });
            let itinerary = itinerary.unwrap_or_else(|e| {
                warn!("Itinerary lookup failed: {}, using fallback", e);
                FallbackSupplier::itinerary()
            });

            Ok(StagePayload::Perception(PerceptionPayload {
                weather: Some(weather),
                venues,
                itinerary,
                location: Some(Location {
                    city: user.location().to_string(),
                    district: None,
                }),
                time_context: None,
            }))
        }
        StageRequest::Reasoning { body, .. } => bounded(backend.reason(body), timeout)
            .await
            .map(StagePayload::Reasoning),
        StageRequest::Action { body, .. } => bounded(backend.act(body), timeout)
            .await
            .map(StagePayload::Action),
        StageRequest::Learning { body, .. } => bounded(backend.learn(body), timeout)
            .await
            .map(StagePayload::Learning),
    }
}
