use super::context::{RunContext, RunEpoch};
use crate::payload::StagePayload;
use crate::services::backend::StageError;

#[derive(Debug)]
pub enum Event {
    /// User submitted the form: start a fresh run.
    Submit(RunContext),
    /// A stage request settled. `result` is Err on any failure; the kernel
    /// substitutes the fallback literal.
    StageResolved {
        epoch: RunEpoch,
        result: Result<StagePayload, StageError>,
    },
}

/// Where a stored payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PayloadSource {
    Live,
    Fallback,
}
