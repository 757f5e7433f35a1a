use std::collections::{BTreeMap, VecDeque};

use super::event::TelemetryEvent;
use crate::kernel::event::PayloadSource;
use crate::kernel::stage::Stage;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub run_stats: RunStats,
    pub payload_stats: PayloadStats,
    pub stale_discarded: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub started: u64,
    pub completed: u64,
    pub abandoned: u64,
    pub stages_entered: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadStats {
    pub live: u64,
    pub fallback: u64,
    pub fallbacks_by_stage: BTreeMap<Stage, u64>,
    /// Share of stored payloads that were fallbacks, 0.0 - 1.0.
    pub fallback_ratio: f64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::RunStarted { .. } => snap.run_stats.started += 1,
            TelemetryEvent::RunCompleted { .. } => snap.run_stats.completed += 1,
            TelemetryEvent::RunAbandoned { .. } => snap.run_stats.abandoned += 1,
            TelemetryEvent::StageEntered { .. } => snap.run_stats.stages_entered += 1,
            TelemetryEvent::PayloadStored { stage, source, .. } => match source {
                PayloadSource::Live => snap.payload_stats.live += 1,
                PayloadSource::Fallback => {
                    snap.payload_stats.fallback += 1;
                    *snap.payload_stats.fallbacks_by_stage.entry(*stage).or_insert(0) += 1;
                }
            },
            TelemetryEvent::StaleDiscarded { .. } => snap.stale_discarded += 1,
        }
    }

    let stored = snap.payload_stats.live + snap.payload_stats.fallback;
    if stored > 0 {
        snap.payload_stats.fallback_ratio = snap.payload_stats.fallback as f64 / stored as f64;
    }

    snap
}
