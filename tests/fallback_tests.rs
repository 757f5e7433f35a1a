mod common;

use common::{dispatched, ScriptedBackend};
use std::sync::Arc;
use std::time::Duration;

use voyager::kernel::event::PayloadSource;
use voyager::kernel::machine::RunMachine;
use voyager::payload::{StagePayload, Venue};
use voyager::render::html;
use voyager::services::backend::StageError;
use voyager::{ControllerConfig, FallbackSupplier, RunContext, Stage, StageController};

fn traveler() -> RunContext {
    RunContext::new("Sarah", "indoor, cultural")
}

#[test]
fn test_failed_stage_stores_literal_and_advances() {
    let mut machine = RunMachine::new();
    let mut effects = machine.start(traveler());

    while machine.stage() != Stage::Done {
        let request = dispatched(&effects).expect("working stage dispatches");
        effects = machine.resolve(request.epoch(), Err(StageError::Status(500)));
    }

    let supplier = FallbackSupplier::new();
    let run = machine.run().expect("run exists");
    for stage in Stage::PHASES {
        // VERIFY: exactly the literal, byte for byte
        assert_eq!(run.payload(stage), supplier.supply(stage).as_ref(), "{} should hold its literal", stage);
        assert_eq!(run.source(stage), Some(PayloadSource::Fallback));
    }

    let snapshot = machine.telemetry.snapshot();
    assert_eq!(snapshot.payload_stats.fallback, 4);
    assert_eq!(snapshot.payload_stats.live, 0);
    assert_eq!(snapshot.payload_stats.fallback_ratio, 1.0);
    println!("Fallback literals stored for every stage");
}

#[test]
fn test_payload_of_wrong_stage_is_replaced_by_literal() {
    let mut machine = RunMachine::new();
    let effects = machine.start(traveler());
    let request = dispatched(&effects).expect("perception request");

    let wrong = StagePayload::Learning(FallbackSupplier::learning());
    machine.resolve(request.epoch(), Ok(wrong));

    assert_eq!(
        machine.payload(Stage::Perception),
        Some(&StagePayload::Perception(FallbackSupplier::perception()))
    );
    assert_eq!(machine.stage(), Stage::Reasoning, "Run continues after substitution");
}

#[test]
fn test_supplier_has_no_literal_outside_working_stages() {
    let supplier = FallbackSupplier::new();
    assert!(supplier.supply(Stage::Idle).is_none());
    assert!(supplier.supply(Stage::Done).is_none());
    for stage in Stage::PHASES {
        let payload = supplier.supply(stage).expect("working stage literal");
        assert_eq!(payload.stage(), stage);
    }
}

#[test]
fn test_literals_render_like_live_payloads() {
    let supplier = FallbackSupplier::new();
    let markers = [
        (Stage::Perception, "weather-perception"),
        (Stage::Reasoning, "reasoning-process"),
        (Stage::Action, "plan-comparison"),
        (Stage::Learning, "preference-model"),
    ];

    for (stage, marker) in markers {
        let payload = supplier.supply(stage);
        let markup = html::render_stage(stage, payload.as_ref());
        assert!(markup.contains(marker), "{} literal should render its full view", stage);
    }
}

#[test]
fn test_heat_literals_are_consistent() {
    let weather = FallbackSupplier::weather();
    assert_eq!(weather.temperature, 44.0);
    assert_eq!(weather.condition, "Sunny");

    let decision = FallbackSupplier::decision();
    assert_eq!(decision.unsafe_activity.as_deref(), Some("Desert Safari"));
    assert_eq!(decision.confidence, Some(0.85));
    assert!(decision.alternatives.iter().all(|v: &Venue| v.indoor));

    let action = FallbackSupplier::action();
    assert_eq!(action.outdoor_count(), 0, "Adapted literal plan is all indoor");
    assert!(action.original.iter().any(|a| a.name == "Desert Safari" && a.is_outdoor()));
}

#[tokio::test]
async fn test_controller_completes_when_every_call_fails() {
    let backend = ScriptedBackend::failing(&["weather", "venues", "itinerary", "reason", "act", "learn"]);
    let mut controller = StageController::new(Arc::new(backend), ControllerConfig::default());

    controller.start(traveler());
    controller.run_to_completion().await;

    assert!(controller.is_done());
    let supplier = FallbackSupplier::new();
    for stage in Stage::PHASES {
        assert_eq!(controller.machine.payload(stage), supplier.supply(stage).as_ref());
    }
    assert_eq!(controller.machine.telemetry.snapshot().payload_stats.fallback, 4);
}

#[tokio::test]
async fn test_perception_falls_back_per_lookup() {
    let backend = ScriptedBackend::failing(&["weather"]);
    let mut controller = StageController::new(Arc::new(backend), ControllerConfig::default());

    controller.start(traveler().with_location("Abu Dhabi"));
    controller.run_to_completion().await;

    let run = controller.machine.run().expect("run exists");
    let perceived = run
        .payload(Stage::Perception)
        .and_then(StagePayload::as_perception)
        .expect("perception payload");

    // VERIFY: weather substituted, the rest is live
    assert_eq!(perceived.weather, Some(FallbackSupplier::weather()));
    assert_eq!(perceived.location.as_ref().map(|l| l.city.as_str()), Some("Abu Dhabi"));
    assert_eq!(run.source(Stage::Perception), Some(PayloadSource::Live));
}

#[tokio::test]
async fn test_perception_with_all_lookups_failing_uses_stage_literal() {
    let backend = ScriptedBackend::failing(&["weather", "venues", "itinerary"]);
    let mut controller = StageController::new(Arc::new(backend), ControllerConfig::default());

    controller.start(traveler());
    controller.run_to_completion().await;

    let run = controller.machine.run().expect("run exists");
    assert_eq!(
        run.payload(Stage::Perception),
        Some(&StagePayload::Perception(FallbackSupplier::perception()))
    );
    assert_eq!(run.source(Stage::Perception), Some(PayloadSource::Fallback));
    assert_eq!(run.source(Stage::Reasoning), Some(PayloadSource::Live));
}

#[tokio::test]
async fn test_timed_out_stage_uses_literal() {
    let backend = ScriptedBackend {
        reason_delay: Some(Duration::from_secs(5)),
        ..ScriptedBackend::default()
    };
    let config = ControllerConfig {
        request_timeout: Some(Duration::from_millis(50)),
        ..ControllerConfig::default()
    };
    let mut controller = StageController::new(Arc::new(backend), config);

    controller.start(traveler());
    controller.run_to_completion().await;

    let run = controller.machine.run().expect("run exists");
    assert_eq!(run.payload(Stage::Reasoning), Some(&StagePayload::Reasoning(FallbackSupplier::decision())));
    assert_eq!(run.source(Stage::Reasoning), Some(PayloadSource::Fallback));
    assert!(controller.is_done());
}

#[tokio::test]
async fn test_unreachable_http_backend_falls_back_everywhere() {
    use voyager::services::http::HttpBackend;

    let backend = HttpBackend::new("http://127.0.0.1:9/");
    assert_eq!(backend.base_url(), "http://127.0.0.1:9");

    let config = ControllerConfig {
        request_timeout: Some(Duration::from_secs(2)),
        ..ControllerConfig::default()
    };
    let mut controller = StageController::new(Arc::new(backend), config);
    controller.start(traveler());
    controller.run_to_completion().await;

    // VERIFY: the demo never halts on a dead backend
    assert!(controller.is_done());
    let supplier = FallbackSupplier::new();
    for stage in Stage::PHASES {
        assert_eq!(controller.machine.payload(stage), supplier.supply(stage).as_ref());
    }
}
