//! Component-state presentation: a heading per stage, a loading line while
//! the stage is pending, then a JSON dump of the payload.

use serde::Serialize;

use super::html::{number, NO_DATA};
use crate::kernel::stage::Stage;
use crate::payload::{PerceptionPayload, StagePayload};

pub fn render_stage(stage: Stage, payload: Option<&StagePayload>) -> String {
    let body = match (stage, payload) {
        (_, None) => stage.loading_line().unwrap_or(NO_DATA).to_string(),
        (Stage::Perception, Some(StagePayload::Perception(p))) => perception_summary(p),
        (Stage::Reasoning, Some(StagePayload::Reasoning(d))) => dump(d),
        (Stage::Action, Some(StagePayload::Action(a))) => dump(a),
        (Stage::Learning, Some(StagePayload::Learning(l))) => dump(l),
        _ => NO_DATA.to_string(),
    };
    format!("== {} ==\n{}", stage.label(), body)
}

fn perception_summary(p: &PerceptionPayload) -> String {
    let weather = p
        .weather
        .as_ref()
        .map(|w| format!("{}°C, {}", number(w.temperature), w.condition))
        .unwrap_or_else(|| NO_DATA.to_string());

    let venues = if p.venues.is_empty() {
        NO_DATA.to_string()
    } else {
        p.venues.iter().map(|v| v.name.as_str()).collect::<Vec<_>>().join(", ")
    };

    format!("Weather: {}\nVenues: {}", weather, venues)
}

pub(super) fn dump<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| NO_DATA.to_string())
}
