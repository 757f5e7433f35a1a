use std::collections::BTreeMap;
use tracing::warn;

use super::context::{RunContext, RunEpoch, RunId};
use super::event::PayloadSource;
use super::request::StageRequest;
use super::stage::Stage;
use crate::payload::StagePayload;

/// Strict state delta. This is the ONLY way run state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    StageEntered(Stage),
    RequestIssued(StageRequest),
    PayloadStored {
        payload: StagePayload,
        source: PayloadSource,
    },
}

/// Everything scoped to one demo run. Discarded wholesale on the next start.
#[derive(Debug, Clone)]
pub struct RunState {
    id: RunId,
    context: RunContext,
    stage: Stage,
    payloads: BTreeMap<Stage, StagePayload>,
    sources: BTreeMap<Stage, PayloadSource>,
    requests: BTreeMap<Stage, StageRequest>,
    in_flight: Option<Stage>,
    /// Monotonic, bumped on every applied delta.
    pub version: u64,
}

impl RunState {
    pub fn new(context: RunContext) -> Self {
        Self {
            id: RunId::new(),
            context,
            stage: Stage::Idle,
            payloads: BTreeMap::new(),
            sources: BTreeMap::new(),
            requests: BTreeMap::new(),
            in_flight: None,
            version: 0,
        }
    }

    /// Reduction: State + Delta -> Mutated State.
    /// Deltas that would break run invariants are dropped with a warning.
    pub fn reduce(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::StageEntered(stage) => {
                if stage <= self.stage {
                    warn!("Rejected stage regression {} -> {} for run {}", self.stage, stage, self.id);
                    return;
                }
                self.stage = stage;
            }
            StateDelta::RequestIssued(request) => {
                let epoch = request.epoch();
                let stage = epoch.stage;
                if epoch.run_id != self.id
                    || stage != self.stage
                    || self.in_flight.is_some()
                    || self.requests.contains_key(&stage)
                {
                    warn!("Rejected duplicate request for {} in run {}", stage, self.id);
                    return;
                }
                self.in_flight = Some(stage);
                self.requests.insert(stage, request);
            }
            StateDelta::PayloadStored { payload, source } => {
                let stage = payload.stage();
                if stage != self.stage || self.payloads.contains_key(&stage) {
                    warn!("Rejected payload for {} while run {} is at {}", stage, self.id, self.stage);
                    return;
                }
                if self.in_flight == Some(stage) {
                    self.in_flight = None;
                }
                self.payloads.insert(stage, payload);
                self.sources.insert(stage, source);
            }
        }
        self.version += 1;
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn epoch(&self) -> RunEpoch {
        RunEpoch {
            run_id: self.id,
            stage: self.stage,
        }
    }

    pub fn in_flight(&self) -> Option<Stage> {
        self.in_flight
    }

    pub fn payload(&self, stage: Stage) -> Option<&StagePayload> {
        self.payloads.get(&stage)
    }

    /// The request issued for a stage, kept for transcript views.
    pub fn request(&self, stage: Stage) -> Option<&StageRequest> {
        self.requests.get(&stage)
    }

    pub fn source(&self, stage: Stage) -> Option<PayloadSource> {
        self.sources.get(&stage).copied()
    }

    pub fn has_payload(&self, stage: Stage) -> bool {
        self.payloads.contains_key(&stage)
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }
}
