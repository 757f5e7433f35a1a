//! Structured HTML fragments, one sub-renderer per stage.
//!
//! Every sub-renderer reads only its own payload and never fails: a missing
//! optional field becomes an explicit placeholder.

use super::confidence::ConfidenceMeter;
use crate::kernel::stage::Stage;
use crate::payload::{
    Activity, ActionPlan, DataSource, Decision, DecisionBasis, LearningRecord, PerceptionPayload,
    PreferenceModel, StagePayload,
};

pub const NO_DATA: &str = "No data";

pub fn render_stage(stage: Stage, payload: Option<&StagePayload>) -> String {
    let body = match (stage, payload) {
        (Stage::Perception, Some(StagePayload::Perception(p))) => perception(p),
        (Stage::Reasoning, Some(StagePayload::Reasoning(d))) => reasoning(d),
        (Stage::Action, Some(StagePayload::Action(a))) => action(a),
        (Stage::Learning, Some(StagePayload::Learning(l))) => learning(l),
        _ => placeholder(NO_DATA),
    };
    component(&element_id(stage), stage.label(), &body)
}

pub fn render_data_sources(sources: &[DataSource]) -> String {
    let body = if sources.is_empty() {
        placeholder("No data sources")
    } else {
        let items: String = sources
            .iter()
            .map(|source| {
                format!(
                    r#"<div class="source-item {status}"><div class="source-status-indicator"></div><div class="source-name">{name}</div><div class="source-type">{kind}</div><div class="source-status">{status}</div></div>"#,
                    status = escape(&source.status),
                    name = escape(&source.name),
                    kind = escape(&source.kind),
                )
            })
            .collect();
        format!(
            r#"<div class="data-sources-list"><div class="sources-header"><div class="source-title">Real-Time Data Sources</div></div><div class="sources-list">{}</div></div>"#,
            items
        )
    };
    component("data-sources", "Data Sources", &body)
}

fn element_id(stage: Stage) -> String {
    format!("{}-visual", stage.label().to_lowercase())
}

fn component(id: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div id="{id}" class="agentic-visual-component"><h3>{title}</h3><div class="visual-content">{body}</div></div>"#
    )
}

pub fn placeholder(text: &str) -> String {
    format!(r#"<p class="no-data">{}</p>"#, escape(text))
}

fn value_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="data-value"><span class="value-label">{}:</span> <span class="value-data">{}</span></div>"#,
        escape(label),
        escape(value)
    )
}

fn perception(p: &PerceptionPayload) -> String {
    let mut html = String::new();

    match &p.weather {
        Some(weather) => {
            let updated = weather
                .last_updated
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| NO_DATA.to_string());
            let condition = if weather.condition.is_empty() { NO_DATA } else { weather.condition.as_str() };
            html.push_str(&format!(
                r#"<div class="perception-item weather-perception"><div class="data-source"><span class="source-name">{}</span></div><div class="data-values">{}{}{}</div></div>"#,
                escape(weather.data_source.as_deref().unwrap_or("Weather Service")),
                value_row("Temperature", &format!("{}°C", number(weather.temperature))),
                value_row("Conditions", condition),
                value_row("Last Updated", &updated),
            ));
        }
        None => html.push_str(&placeholder("No weather data")),
    }

    match &p.location {
        Some(location) => html.push_str(&format!(
            r#"<div class="perception-item location-perception"><div class="data-source"><span class="source-name">Location Service</span></div><div class="data-values">{}{}</div></div>"#,
            value_row("City", &location.city),
            value_row("District", location.district.as_deref().unwrap_or(NO_DATA)),
        )),
        None => html.push_str(&placeholder("No location data")),
    }

    match &p.time_context {
        Some(time) => html.push_str(&format!(
            r#"<div class="perception-item time-perception"><div class="data-source"><span class="source-name">Time Context</span></div><div class="data-values">{}{}{}</div></div>"#,
            value_row("Local Time", &time.local_time.format("%H:%M:%S").to_string()),
            value_row("Day", &time.day_of_week),
            value_row("Time of Day", &time.time_of_day),
        )),
        None => html.push_str(&placeholder("No time context")),
    }

    if p.venues.is_empty() {
        html.push_str(&placeholder("No venue data"));
    } else {
        let venues: String = p
            .venues
            .iter()
            .map(|v| {
                format!(
                    r#"<li class="venue {place}"><span class="venue-name">{name}</span> <span class="venue-type">{kind}</span> <span class="venue-rating">{rating}</span></li>"#,
                    place = if v.indoor { "indoor" } else { "outdoor" },
                    name = escape(&v.name),
                    kind = escape(&v.kind),
                    rating = number(v.rating),
                )
            })
            .collect();
        html.push_str(&format!(r#"<ul class="perception-item venues">{}</ul>"#, venues));
    }

    html
}

fn reasoning(d: &Decision) -> String {
    let basis = if d.reason.eq_ignore_ascii_case("energy") {
        DecisionBasis::Energy
    } else {
        d.basis
    };

    let (title, factors, conclusion): (&str, &[(&str, u8)], &str) = match basis {
        DecisionBasis::Weather => (
            "Weather-based Decision Analysis",
            &[("Temperature Impact", 90), ("User Comfort Threshold", 85), ("Activity Suitability", 30)],
            "Outdoor activities are unsuitable due to extreme heat exceeding traveler comfort threshold.",
        ),
        DecisionBasis::Energy => (
            "Energy-based Decision Analysis",
            &[("Current Energy Level", 35), ("Activity Energy Requirement", 80), ("Rest Opportunity", 20)],
            "High-energy activities are unsuitable due to current low energy levels.",
        ),
        DecisionBasis::Clear => ("Plan Review", &[], "The current plan remains suitable."),
    };

    let factor_html: String = factors
        .iter()
        .map(|(name, width)| {
            format!(
                r#"<div class="factor"><div class="factor-name">{name}</div><div class="factor-bar"><div class="factor-value" style="width: {width}%;"></div></div></div>"#
            )
        })
        .collect();

    let flagged = d.flagged();
    let unsafe_html = if flagged.is_empty() {
        placeholder("No unsafe activities")
    } else {
        let names: Vec<String> = flagged.iter().map(|n| escape(n)).collect();
        format!(r#"<div class="reasoning-unsafe">Unsafe: {}</div>"#, names.join(", "))
    };

    let reason_html = if d.reason.is_empty() {
        placeholder(NO_DATA)
    } else {
        format!(r#"<div class="reasoning-reason">{}</div>"#, escape(&d.reason))
    };

    let alternatives_html = if d.alternatives.is_empty() {
        placeholder("No alternatives")
    } else {
        let names: Vec<String> = d.alternatives.iter().map(|v| escape(&v.name)).collect();
        format!(r#"<div class="reasoning-alternatives">Alternatives: {}</div>"#, names.join(", "))
    };

    // A zero score draws no meter, same as an absent one.
    let meter = d
        .confidence
        .filter(|c| *c > 0.0)
        .map(|c| ConfidenceMeter::from_score(c).to_html())
        .unwrap_or_default();

    format!(
        r#"<div class="reasoning-process"><div class="reasoning-header"><div class="reasoning-title">{title}</div></div><div class="reasoning-factors">{factor_html}</div>{unsafe_html}{reason_html}{alternatives_html}<div class="reasoning-conclusion"><p>{conclusion}</p></div></div>{meter}"#
    )
}

fn action(plan: &ActionPlan) -> String {
    let status = if plan.message.is_empty() {
        "Itinerary successfully adapted".to_string()
    } else {
        escape(&plan.message)
    };

    format!(
        r#"<div class="action-process"><div class="action-header"><div class="action-title">Itinerary Adaptation</div></div><div class="plan-comparison"><div class="original-plan"><h4>Original Plan</h4><div class="plan-activities">{}</div></div><div class="plan-arrow">→</div><div class="new-plan"><h4>Adapted Plan</h4><div class="plan-activities">{}</div></div></div><div class="action-status"><div class="status-message">{}</div></div></div>"#,
        activities(&plan.original),
        activities(&plan.updated_itinerary),
        status,
    )
}

fn activities(list: &[Activity]) -> String {
    if list.is_empty() {
        return "<p>No activities</p>".to_string();
    }

    list.iter()
        .map(|a| {
            let place = if a.is_outdoor() { "outdoor" } else { "indoor" };
            let tag = if a.is_outdoor() {
                r#"<span class="tag outdoor">Outdoor</span>"#
            } else {
                r#"<span class="tag indoor">Indoor</span>"#
            };
            let energy = a
                .energy_required
                .map(|e| {
                    let level = (e * 10.0).round() as i64;
                    format!(r#"<span class="tag energy-{level}">Energy: {level}/10</span>"#)
                })
                .unwrap_or_default();
            let updated = if a.updated { r#"<span class="tag updated">Updated</span>"# } else { "" };
            let location = if a.location.is_empty() { NO_DATA } else { a.location.as_str() };

            format!(
                r#"<div class="activity {place}"><div class="activity-time">{}</div><div class="activity-name">{}</div><div class="activity-location">{}</div><div class="activity-tags">{tag}{energy}{updated}</div></div>"#,
                escape(&a.time),
                escape(&a.name),
                escape(location),
            )
        })
        .collect()
}

fn learning(record: &LearningRecord) -> String {
    let updates = if record.updates.is_empty() {
        placeholder("No preference updates")
    } else {
        let items: String = record
            .updates
            .iter()
            .map(|u| format!("<li>{}</li>", escape(u)))
            .collect();
        format!(r#"<ul class="learning-updates">{}</ul>"#, items)
    };

    let impact = if record.impact.is_empty() {
        placeholder("No impact scores")
    } else {
        let items: String = record
            .impact
            .iter()
            .map(|(name, score)| {
                format!(
                    r#"<div class="impact-item"><span class="impact-name">{}</span> <span class="impact-score">{}%</span></div>"#,
                    escape(name),
                    number(*score)
                )
            })
            .collect();
        format!(r#"<div class="learning-impact">{}</div>"#, items)
    };

    format!(
        r#"<div class="learning-process"><div class="learning-header"><div class="learning-title">Preference Learning</div></div><div class="preference-model"><h4>Current Preference Model</h4><div class="preference-items">{}</div></div>{}{}<div class="learning-status"><div class="status-message">Preferences updated based on recent decisions</div></div></div>"#,
        preferences(record.preferences.as_ref()),
        updates,
        impact,
    )
}

fn preferences(model: Option<&PreferenceModel>) -> String {
    let Some(model) = model else {
        return "<p>No preference data available</p>".to_string();
    };
    if model.is_empty() {
        return "<p>No specific preferences found</p>".to_string();
    }

    let mut html = String::new();
    if let Some(max) = model.max_comfortable_temperature {
        html.push_str(&preference_item("Max Comfortable Temperature", &format!("{}°C", number(max)), 90));
    }
    if let Some(cuisines) = &model.cuisine_preferences {
        html.push_str(&preference_item("Cuisine Preferences", &cuisines.join(", "), 85));
    }
    if let Some(activities) = &model.activity_preferences {
        html.push_str(&preference_item("Activity Preferences", &activities.join(", "), 80));
    }
    if let Some(budget) = &model.budget_level {
        html.push_str(&preference_item("Budget Level", budget, 95));
    }
    html
}

fn preference_item(name: &str, value: &str, confidence: u8) -> String {
    let value = if value.is_empty() { NO_DATA } else { value };
    format!(
        r#"<div class="preference-item"><div class="preference-name">{}</div><div class="preference-value">{}</div><div class="confidence-indicator" style="width: {}%;"></div></div>"#,
        name,
        escape(value),
        confidence
    )
}

/// Whole numbers print without a fraction, others with one decimal.
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
