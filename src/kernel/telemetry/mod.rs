//! Run telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside transition logic (RunMachine, StageGraph).
//! It exists solely for observability and verification.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (name, preferences, payload data).
//! Only run ids, stages and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
