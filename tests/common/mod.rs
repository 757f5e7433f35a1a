#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use voyager::agent::LocalAgent;
use voyager::kernel::machine::Effect;
use voyager::kernel::request::{ActionRequest, LearnRequest, ReasonRequest, StageRequest};
use voyager::payload::{Activity, ActionPlan, Decision, LearningRecord, Venue, Weather};
use voyager::services::backend::{StageBackend, StageError};

/// Traveler name whose learning call waits on the gate.
pub const SLOW_TRAVELER: &str = "Slow";

/// LocalAgent answers, with selected calls failing, delayed or gated.
#[derive(Default)]
pub struct ScriptedBackend {
    pub inner: LocalAgent,
    /// Call names that fail: weather, venues, itinerary, reason, act, learn.
    pub failing: Vec<&'static str>,
    /// Delay applied to the reasoning call.
    pub reason_delay: Option<Duration>,
    /// Learning for SLOW_TRAVELER blocks until notified.
    pub gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    pub fn failing(calls: &[&'static str]) -> Self {
        Self {
            failing: calls.to_vec(),
            ..Self::default()
        }
    }

    fn check(&self, call: &str) -> Result<(), StageError> {
        if self.failing.contains(&call) {
            Err(StageError::Status(503))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StageBackend for ScriptedBackend {
    async fn weather(&self, location: &str) -> Result<Weather, StageError> {
        self.check("weather")?;
        self.inner.weather(location).await
    }

    async fn venues(&self, location: &str, preferences: &str) -> Result<Vec<Venue>, StageError> {
        self.check("venues")?;
        self.inner.venues(location, preferences).await
    }

    async fn itinerary(&self, traveler: &str) -> Result<Vec<Activity>, StageError> {
        self.check("itinerary")?;
        self.inner.itinerary(traveler).await
    }

    async fn reason(&self, request: &ReasonRequest) -> Result<Decision, StageError> {
        if let Some(delay) = self.reason_delay {
            tokio::time::sleep(delay).await;
        }
        self.check("reason")?;
        self.inner.reason(request).await
    }

    async fn act(&self, request: &ActionRequest) -> Result<ActionPlan, StageError> {
        self.check("act")?;
        self.inner.act(request).await
    }

    async fn learn(&self, request: &LearnRequest) -> Result<LearningRecord, StageError> {
        if request.user.name() == SLOW_TRAVELER {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            return Ok(LearningRecord {
                updates: vec!["late update from an abandoned run".to_string()],
                ..LearningRecord::default()
            });
        }
        self.check("learn")?;
        self.inner.learn(request).await
    }
}

pub fn dispatched(effects: &[Effect]) -> Option<StageRequest> {
    effects.iter().find_map(|effect| match effect {
        Effect::Dispatch(request) => Some(request.clone()),
        _ => None,
    })
}
