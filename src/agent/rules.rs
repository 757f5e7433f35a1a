use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::kernel::request::{ActionRequest, LearnRequest, ReasonRequest};
use crate::payload::{Activity, ActionPlan, Decision, DecisionBasis, LearningRecord, PreferenceModel, Venue};

/// Above this (°C) outdoor activities are unsafe.
pub const HEAT_THRESHOLD_C: f64 = 40.0;
/// Below this energy level high-effort activities are unsafe.
pub const LOW_ENERGY: f64 = 0.4;
pub const HIGH_ENERGY_REQUIRED: f64 = 0.7;
const HEAT_MESSAGE: &str = "Itinerary updated due to extreme heat.";
/// Assumed effort for activities that do not state one.
const DEFAULT_ENERGY_REQUIRED: f64 = 0.5;

/// Pure function: (conditions, plan, traveler energy) -> Decision
///
/// Weather rules take precedence over energy rules.
pub fn assess(request: &ReasonRequest, energy_level: Option<f64>) -> Decision {
    let weather = &request.weather;
    let condition = weather.condition.to_lowercase();
    let hot = weather.temperature > HEAT_THRESHOLD_C;
    let wet = condition.contains("rain") || condition.contains("storm");

    let alternatives = rank_alternatives(&request.venues, &request.user.preference_keywords());

    if hot || wet {
        let flagged: Vec<String> = request
            .itinerary
            .iter()
            .filter(|a| a.is_outdoor())
            .map(|a| a.name.clone())
            .collect();

        if !flagged.is_empty() {
            let (reason, confidence) = if hot {
                (
                    format!("Outdoor temperature exceeds safety threshold ({}°C)", weather.temperature),
                    0.9,
                )
            } else {
                (
                    format!("{} makes outdoor activities unsafe", weather.condition),
                    0.75,
                )
            };
            return Decision {
                unsafe_activity: flagged.first().cloned(),
                unsafe_activities: flagged,
                reason,
                basis: DecisionBasis::Weather,
                alternatives,
                confidence: Some(confidence),
            };
        }
    }

    if let Some(energy) = energy_level.filter(|e| *e < LOW_ENERGY) {
        let flagged: Vec<String> = request
            .itinerary
            .iter()
            .filter(|a| a.energy_required.unwrap_or(DEFAULT_ENERGY_REQUIRED) > HIGH_ENERGY_REQUIRED)
            .map(|a| a.name.clone())
            .collect();

        if !flagged.is_empty() {
            return Decision {
                unsafe_activity: flagged.first().cloned(),
                unsafe_activities: flagged,
                reason: format!("Traveler energy too low ({:.1}) for high-energy activities", energy),
                basis: DecisionBasis::Energy,
                alternatives,
                confidence: Some(0.65),
            };
        }
    }

    Decision {
        unsafe_activity: None,
        unsafe_activities: Vec::new(),
        reason: "Current plan is compatible with conditions".to_string(),
        basis: DecisionBasis::Clear,
        alternatives: Vec::new(),
        confidence: Some(1.0),
    }
}

/// Indoor venues only: preference matches first, then by rating (desc).
pub fn rank_alternatives(venues: &[Venue], keywords: &[String]) -> Vec<Venue> {
    let mut indoor: Vec<Venue> = venues.iter().filter(|v| v.indoor).cloned().collect();
    indoor.sort_by(|a, b| {
        let a_match = matches_preferences(a, keywords);
        let b_match = matches_preferences(b, keywords);
        b_match
            .cmp(&a_match)
            .then(b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
    });
    indoor
}

fn matches_preferences(venue: &Venue, keywords: &[String]) -> bool {
    let haystack = format!("{} {}", venue.name, venue.kind).to_lowercase();
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

/// Pure function: (decision, plan) -> adapted plan
///
/// Each flagged activity takes the next unused indoor alternative in its time
/// slot. With no alternative left the activity is dropped, never kept.
pub fn adapt(request: &ActionRequest) -> ActionPlan {
    let flagged = request.decision.flagged();
    let mut alternatives = request.decision.alternatives.iter().filter(|v| v.indoor);

    let mut updated = Vec::with_capacity(request.itinerary.len());
    let mut changes = 0usize;

    for activity in &request.itinerary {
        if !flagged.contains(&activity.name.as_str()) {
            updated.push(activity.clone());
            continue;
        }

        changes += 1;
        if let Some(venue) = alternatives.next() {
            updated.push(Activity {
                time: activity.time.clone(),
                name: format!("{} Visit", venue.name),
                category: Some(venue.kind.clone()),
                location: venue.name.clone(),
                indoor: true,
                energy_required: None,
                updated: true,
            });
        }
    }

    let message = if changes == 0 {
        "No changes needed."
    } else {
        match request.decision.basis {
            DecisionBasis::Energy => "Itinerary updated to match your energy level.",
            _ if request.decision.reason.contains("temperature") => HEAT_MESSAGE,
            _ => "Itinerary updated due to weather.",
        }
    };

    ActionPlan {
        original: request.itinerary.clone(),
        updated_itinerary: updated,
        message: message.to_string(),
    }
}

/// Pure function: (adapted plan, user) -> preference updates
pub fn learn(request: &LearnRequest) -> LearningRecord {
    let plan = &request.action;
    let keywords = request.user.preference_keywords();

    let replaced = plan.updated_itinerary.iter().filter(|a| a.updated).count();
    let original_outdoor = plan.original.iter().filter(|a| a.is_outdoor()).count();
    let avoided_outdoor = original_outdoor.saturating_sub(plan.outdoor_count());

    let mut updates = Vec::new();
    let mut preferences = PreferenceModel::default();

    if plan.message.contains("energy") {
        if replaced > 0 {
            updates.push("Added \"Lighter activities preferred when energy is low\"".to_string());
        }
    } else if avoided_outdoor > 0 {
        let heat = plan.message == HEAT_MESSAGE;
        let warning = if heat { "heat" } else { "weather" };
        updates.push(format!("Added \"Indoor activities preferred during {} warnings\"", warning));
        if heat {
            preferences.max_comfortable_temperature = Some(HEAT_THRESHOLD_C);
        }
    }

    for keyword in &keywords {
        updates.push(format!("Updated {} venue preference ranking", keyword));
    }
    if !keywords.is_empty() {
        preferences.activity_preferences = Some(keywords.clone());
    }

    if updates.is_empty() {
        updates.push("Reinforced existing preferences".to_string());
    }

    let adaptability = (70.0 + 5.0 * replaced as f64).min(95.0);
    let accuracy = (80.0 + 4.0 * keywords.len() as f64).min(95.0);
    let mut impact = BTreeMap::new();
    impact.insert("weatherAdaptability".to_string(), adaptability);
    impact.insert("culturalPreferenceAccuracy".to_string(), accuracy);
    impact.insert("satisfactionPrediction".to_string(), ((adaptability + accuracy) / 2.0).round());

    LearningRecord {
        updates,
        impact,
        preferences: if preferences.is_empty() { None } else { Some(preferences) },
    }
}
