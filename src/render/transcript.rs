//! Tool-call transcript: each stage as the boundary calls it made and the
//! responses it got back, in the order an agent would issue them.

use serde_json::{json, Value};

use super::html::{escape, NO_DATA};
use super::json::dump;
use crate::kernel::request::StageRequest;
use crate::kernel::stage::Stage;
use crate::payload::{PerceptionPayload, StagePayload};

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Phase(String),
    Call(String),
    Response(String),
    Loading(String),
}

impl Entry {
    fn to_html(&self) -> String {
        let (class, icon, title, content) = match self {
            Entry::Phase(text) => ("phase", "🤖", "System:", text),
            Entry::Call(text) => ("request", "🔧", "Tool Call:", text),
            Entry::Response(text) => ("response", "📤", "Response:", text),
            Entry::Loading(text) => ("loading", "🤖", "System:", text),
        };
        format!(
            r#"<div class="tool-call {class}"><span class="tool-icon">{icon}</span><div class="tool-content"><span class="tool-title">{title}</span><pre>{}</pre></div></div>"#,
            escape(content)
        )
    }
}

pub fn render_stage(stage: Stage, request: Option<&StageRequest>, payload: Option<&StagePayload>) -> String {
    let body: String = entries(stage, request, payload).iter().map(Entry::to_html).collect();
    format!(
        r#"<div id="{}-tool-calls" class="tool-calls-container">{}</div>"#,
        stage.label().to_lowercase(),
        body
    )
}

/// The transcript lines for one stage.
///
/// Calls come from the issued request, responses from the stored payload.
/// Without a request only responses are listed; without a payload the calls
/// are followed by the stage's loading line.
pub fn entries(stage: Stage, request: Option<&StageRequest>, payload: Option<&StagePayload>) -> Vec<Entry> {
    if !stage.is_phase() {
        return vec![Entry::Phase(NO_DATA.to_string())];
    }

    let mut entries = vec![Entry::Phase(format!("Entering {} Phase", stage))];

    let call_lines = request
        .filter(|r| r.epoch().stage == stage)
        .map(calls)
        .unwrap_or_default();

    let response_lines = match payload {
        None => None,
        Some(payload) if payload.stage() == stage => Some(responses(payload)),
        Some(_) => {
            entries.push(Entry::Phase(NO_DATA.to_string()));
            return entries;
        }
    };

    let pairs = call_lines.len().max(response_lines.as_ref().map_or(0, Vec::len));
    for i in 0..pairs {
        if let Some(call) = call_lines.get(i) {
            entries.push(Entry::Call(call.clone()));
        }
        if let Some(response) = response_lines.as_ref().and_then(|r| r.get(i)) {
            entries.push(Entry::Response(response.clone()));
        }
    }

    if response_lines.is_none() {
        if let Some(line) = stage.loading_line() {
            entries.push(Entry::Loading(line.to_string()));
        }
    }

    entries
}

fn calls(request: &StageRequest) -> Vec<String> {
    match request {
        StageRequest::Perception { user, .. } => vec![
            format!("get_current_weather({})", quoted(user.location())),
            format!("find_venues({}, {})", quoted(user.location()), quoted(user.preferences())),
            format!("get_traveler_itinerary({})", quoted(user.name())),
        ],
        StageRequest::Reasoning { body, .. } => {
            let outdoor: Vec<&str> = body
                .itinerary
                .iter()
                .filter(|a| a.is_outdoor())
                .map(|a| a.name.as_str())
                .collect();
            let args = json!({
                "temperature": body.weather.temperature,
                "condition": body.weather.condition,
                "outdoor_activities": outdoor,
                "candidate_venues": body.venues.len(),
            });
            vec![format!("analyze_activity_safety({})", args)]
        }
        StageRequest::Action { body, .. } => {
            let alternatives: Vec<&str> = body.decision.alternatives.iter().map(|v| v.name.as_str()).collect();
            let args = json!({
                "unsafe_activities": body.decision.flagged(),
                "alternatives": alternatives,
                "travelers": [body.user.name()],
            });
            vec![format!("adapt_itinerary({})", args)]
        }
        StageRequest::Learning { body, .. } => {
            let changes = body.action.updated_itinerary.iter().filter(|a| a.updated).count();
            let args = json!({
                "traveler_id": body.user.name(),
                "preferences": body.user.preference_keywords(),
                "changes": changes,
            });
            vec![format!("update_traveler_preferences({})", args)]
        }
    }
}

fn responses(payload: &StagePayload) -> Vec<String> {
    match payload {
        StagePayload::Perception(p) => perception_responses(p),
        StagePayload::Reasoning(d) => vec![dump(d)],
        StagePayload::Action(a) => vec![dump(a)],
        StagePayload::Learning(l) => vec![dump(l)],
    }
}

fn perception_responses(p: &PerceptionPayload) -> Vec<String> {
    vec![dump(&p.weather), dump(&p.venues), dump(&p.itinerary)]
}

fn quoted(text: &str) -> String {
    Value::from(text).to_string()
}
