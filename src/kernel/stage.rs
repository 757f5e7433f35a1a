use serde::{Deserialize, Serialize};
use std::fmt;

/// The linear position of a demo run.
/// Ordered by declaration: a run only ever moves to a greater value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Run created, nothing requested yet.
    #[default]
    Idle,
    /// Weather, venues and the traveler's current plan are gathered.
    Perception,
    /// The agent decides which activities are unsafe.
    Reasoning,
    /// The itinerary is adapted.
    Action,
    /// Preference updates are recorded.
    Learning,
    /// Terminal. No further requests.
    Done,
}

impl Stage {
    /// The four working stages in order.
    pub const PHASES: [Stage; 4] = [
        Stage::Perception,
        Stage::Reasoning,
        Stage::Action,
        Stage::Learning,
    ];

    /// True for the four stages that fetch a payload.
    pub fn is_phase(self) -> bool {
        matches!(
            self,
            Stage::Perception | Stage::Reasoning | Stage::Action | Stage::Learning
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::Perception => "Perception",
            Stage::Reasoning => "Reasoning",
            Stage::Action => "Action",
            Stage::Learning => "Learning",
            Stage::Done => "Done",
        }
    }

    /// Line shown while the stage's request is in flight.
    pub fn loading_line(self) -> Option<&'static str> {
        match self {
            Stage::Perception => Some("Loading weather and venues..."),
            Stage::Reasoning => Some("Reasoning..."),
            Stage::Action => Some("Taking action..."),
            Stage::Learning => Some("Learning from preferences..."),
            Stage::Idle | Stage::Done => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signals that request a stage transition.
/// These are REQUESTS. The graph decides whether they apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSignal {
    /// A run was submitted.
    Start,
    /// The current stage's payload is stored.
    Advance,
}

/// The transition table for a run.
pub struct StageGraph;

impl StageGraph {
    /// Pure function: (Current Stage, Signal) -> Next Stage
    /// Returns None if the transition is invalid or the run is already terminal.
    pub fn transition(current: Stage, signal: StageSignal) -> Option<Stage> {
        use Stage::*;
        use StageSignal::*;

        match (current, signal) {
            (Idle, Start) => Some(Perception),

            (Perception, Advance) => Some(Reasoning),
            (Reasoning, Advance) => Some(Action),
            (Action, Advance) => Some(Learning),
            (Learning, Advance) => Some(Done),

            // No regression, no skipping, nothing after Done.
            _ => None,
        }
    }
}
