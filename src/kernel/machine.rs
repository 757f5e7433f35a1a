use tracing::{debug, info, warn};

use super::context::{RunContext, RunEpoch, RunId};
use super::event::{Event, PayloadSource};
use super::fallback::FallbackSupplier;
use super::request::{ActionRequest, LearnRequest, ReasonRequest, StageRequest};
use super::stage::{Stage, StageGraph, StageSignal};
use super::state::{RunState, StateDelta};
use super::telemetry::event::TelemetryEvent;
use super::telemetry::recorder::TelemetryRecorder;
use crate::payload::StagePayload;
use crate::services::backend::StageError;

/// Work the driver must carry out after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue this request; report back with `Event::StageResolved`.
    Dispatch(StageRequest),
    /// The view for this stage changed (entered or payload stored).
    Render(Stage),
    /// The run reached Done.
    Completed(RunId),
}

/// Pure stage sequencing for the active run.
/// MUST NOT await I/O or timers. The async side lives in `StageController`.
#[derive(Debug, Default)]
pub struct RunMachine {
    run: Option<RunState>,
    fallback: FallbackSupplier,
    pub telemetry: TelemetryRecorder,
}

impl RunMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Active stage, Idle before the first start.
    pub fn stage(&self) -> Stage {
        self.run.as_ref().map(RunState::stage).unwrap_or_default()
    }

    pub fn payload(&self, stage: Stage) -> Option<&StagePayload> {
        self.run.as_ref().and_then(|run| run.payload(stage))
    }

    pub fn request(&self, stage: Stage) -> Option<&StageRequest> {
        self.run.as_ref().and_then(|run| run.request(stage))
    }

    /// Batch step: applies events in arrival order.
    pub fn step(&mut self, events: Vec<Event>) -> Vec<Effect> {
        let mut effects = Vec::new();
        for event in events {
            match event {
                Event::Submit(context) => effects.extend(self.start(context)),
                Event::StageResolved { epoch, result } => effects.extend(self.resolve(epoch, result)),
            }
        }
        effects
    }

    /// Replaces any previous run and issues the Perception request.
    pub fn start(&mut self, context: RunContext) -> Vec<Effect> {
        if let Some(previous) = &self.run {
            if !previous.is_done() {
                info!("Discarding run {} at {}", previous.id(), previous.stage());
                self.telemetry.record(TelemetryEvent::RunAbandoned {
                    run_id: previous.id(),
                    at: previous.stage(),
                });
            }
        }

        let mut run = RunState::new(context);
        let run_id = run.id();
        self.telemetry.record(TelemetryEvent::RunStarted { run_id });

        let Some(first) = StageGraph::transition(run.stage(), StageSignal::Start) else {
            return Vec::new();
        };
        run.reduce(StateDelta::StageEntered(first));
        self.telemetry.record(TelemetryEvent::StageEntered { run_id, stage: first });
        self.run = Some(run);
        info!("Run {} started", run_id);

        let mut effects = vec![Effect::Render(first)];
        effects.extend(self.issue());
        effects
    }

    /// Stores the settled payload (or the fallback literal on failure) and advances.
    /// Resolutions for any run or stage other than the active one are ignored.
    pub fn resolve(&mut self, epoch: RunEpoch, result: Result<StagePayload, StageError>) -> Vec<Effect> {
        let is_current = self
            .run
            .as_ref()
            .map(|run| run.epoch() == epoch && run.in_flight() == Some(epoch.stage))
            .unwrap_or(false);

        if !is_current {
            info!("Discarded stale resolution for {} of run {}", epoch.stage, epoch.run_id);
            self.telemetry.record(TelemetryEvent::StaleDiscarded { epoch });
            return Vec::new();
        }

        let stage = epoch.stage;
        let (payload, source) = match result {
            Ok(payload) if payload.stage() == stage => (Some(payload), PayloadSource::Live),
            Ok(payload) => {
                warn!("{} data unavailable: got a {} payload, using fallback", stage, payload.stage());
                (self.fallback.supply(stage), PayloadSource::Fallback)
            }
            Err(e) => {
                warn!("{} data unavailable: {}, using fallback", stage, e);
                (self.fallback.supply(stage), PayloadSource::Fallback)
            }
        };
        let Some(payload) = payload else {
            return Vec::new();
        };

        if let Some(run) = self.run.as_mut() {
            run.reduce(StateDelta::PayloadStored { payload, source });
            self.telemetry.record(TelemetryEvent::PayloadStored {
                run_id: epoch.run_id,
                stage,
                source,
            });
        }

        let mut effects = vec![Effect::Render(stage)];
        effects.extend(self.advance());
        effects
    }

    /// Moves to the next stage once the current payload is stored.
    /// No-op while the payload is pending, and once the run is Done.
    pub fn advance(&mut self) -> Vec<Effect> {
        let Some(run) = self.run.as_mut() else {
            return Vec::new();
        };

        let current = run.stage();
        if current.is_phase() && !run.has_payload(current) {
            debug!("Advance ignored: {} payload still pending", current);
            return Vec::new();
        }

        let Some(next) = StageGraph::transition(current, StageSignal::Advance) else {
            return Vec::new();
        };

        run.reduce(StateDelta::StageEntered(next));
        let run_id = run.id();
        self.telemetry.record(TelemetryEvent::StageEntered { run_id, stage: next });

        if next == Stage::Done {
            info!("Run {} complete", run_id);
            self.telemetry.record(TelemetryEvent::RunCompleted { run_id });
            return vec![Effect::Completed(run_id)];
        }

        let mut effects = vec![Effect::Render(next)];
        effects.extend(self.issue());
        effects
    }

    fn issue(&mut self) -> Option<Effect> {
        let run = self.run.as_mut()?;
        let stage = run.stage();
        let request = build_request(run)?;

        run.reduce(StateDelta::RequestIssued(request.clone()));
        if run.in_flight() != Some(stage) {
            return None;
        }

        debug!("Dispatching {} request for run {}", stage, run.id());
        Some(Effect::Dispatch(request))
    }
}

/// Each stage's request reads the run context plus earlier stages' payloads.
fn build_request(run: &RunState) -> Option<StageRequest> {
    let epoch = run.epoch();
    let user = run.context().clone();

    let perception = || {
        run.payload(Stage::Perception)
            .and_then(StagePayload::as_perception)
            .cloned()
            .unwrap_or_else(FallbackSupplier::perception)
    };

    match run.stage() {
        Stage::Perception => Some(StageRequest::Perception { epoch, user }),
        Stage::Reasoning => {
            let perceived = perception();
            Some(StageRequest::Reasoning {
                epoch,
                body: ReasonRequest {
                    weather: perceived.weather.unwrap_or_else(FallbackSupplier::weather),
                    venues: perceived.venues,
                    itinerary: perceived.itinerary,
                    user,
                },
            })
        }
        Stage::Action => {
            let decision = run
                .payload(Stage::Reasoning)
                .and_then(StagePayload::as_decision)
                .cloned()
                .unwrap_or_else(FallbackSupplier::decision);
            Some(StageRequest::Action {
                epoch,
                body: ActionRequest {
                    decision,
                    itinerary: perception().itinerary,
                    user,
                },
            })
        }
        Stage::Learning => {
            let action = run
                .payload(Stage::Action)
                .and_then(StagePayload::as_action)
                .cloned()
                .unwrap_or_else(FallbackSupplier::action);
            Some(StageRequest::Learning {
                epoch,
                body: LearnRequest { action, user },
            })
        }
        Stage::Idle | Stage::Done => None,
    }
}
