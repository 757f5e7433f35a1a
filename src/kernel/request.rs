use serde::{Deserialize, Serialize};

use super::context::{RunContext, RunEpoch};
use crate::payload::{Activity, ActionPlan, Decision, Venue, Weather};

/// Body of the reasoning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonRequest {
    pub weather: Weather,
    pub venues: Vec<Venue>,
    pub itinerary: Vec<Activity>,
    pub user: RunContext,
}

/// Body of the action call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub decision: Decision,
    pub itinerary: Vec<Activity>,
    pub user: RunContext,
}

/// Body of the learning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnRequest {
    pub action: ActionPlan,
    pub user: RunContext,
}

/// A stage's data request, tagged with the epoch that issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum StageRequest {
    Perception { epoch: RunEpoch, user: RunContext },
    Reasoning { epoch: RunEpoch, body: ReasonRequest },
    Action { epoch: RunEpoch, body: ActionRequest },
    Learning { epoch: RunEpoch, body: LearnRequest },
}

impl StageRequest {
    pub fn epoch(&self) -> RunEpoch {
        match self {
            StageRequest::Perception { epoch, .. }
            | StageRequest::Reasoning { epoch, .. }
            | StageRequest::Action { epoch, .. }
            | StageRequest::Learning { epoch, .. } => *epoch,
        }
    }
}
