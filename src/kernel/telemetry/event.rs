use serde::{Deserialize, Serialize};

use crate::kernel::context::{RunEpoch, RunId};
use crate::kernel::event::PayloadSource;
use crate::kernel::stage::Stage;

// Allowed: ids, stages, sources
// Forbidden: RunContext fields, payload contents

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    RunStarted {
        run_id: RunId,
    },

    StageEntered {
        run_id: RunId,
        stage: Stage,
    },

    PayloadStored {
        run_id: RunId,
        stage: Stage,
        source: PayloadSource,
    },

    /// A resolution arrived for a run or stage that is no longer active.
    StaleDiscarded {
        epoch: RunEpoch,
    },

    /// A new run replaced one that had not reached Done.
    RunAbandoned {
        run_id: RunId,
        at: Stage,
    },

    RunCompleted {
        run_id: RunId,
    },
}
