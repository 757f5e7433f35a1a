use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::activity::Activity;
use crate::kernel::stage::Stage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Degrees Celsius.
    pub temperature: f64,
    #[serde(default, alias = "conditions")]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, alias = "heatIndex", skip_serializing_if = "Option::is_none")]
    pub heat_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Weather {
    pub fn new(temperature: f64, condition: &str) -> Self {
        Self {
            temperature,
            condition: condition.to_string(),
            humidity: None,
            feels_like: None,
            heat_index: None,
            forecast: None,
            data_source: None,
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(alias = "indoorActivity", default)]
    pub indoor: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(alias = "crowdLevel", default)]
    pub crowd_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeContext {
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub local_time: DateTime<Utc>,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub time_of_day: String,
}

/// What the agent perceived: conditions plus the plan under review.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerceptionPayload {
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub venues: Vec<Venue>,
    #[serde(default, alias = "activities")]
    pub itinerary: Vec<Activity>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub time_context: Option<TimeContext>,
}

/// Which rule family produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    #[default]
    Weather,
    Energy,
    /// Nothing in the plan needed changing.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decision {
    /// The headline activity, usually the first of `unsafe_activities`.
    #[serde(default, alias = "unsafeActivity")]
    pub unsafe_activity: Option<String>,
    #[serde(default)]
    pub unsafe_activities: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub basis: DecisionBasis,
    #[serde(default)]
    pub alternatives: Vec<Venue>,
    /// 0.0 - 1.0
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Decision {
    /// Every activity name flagged unsafe, headline included.
    pub fn flagged(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.unsafe_activities.iter().map(String::as_str).collect();
        if let Some(headline) = self.unsafe_activity.as_deref() {
            if !names.contains(&headline) {
                names.insert(0, headline);
            }
        }
        names
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionPlan {
    #[serde(default, alias = "original_plan")]
    pub original: Vec<Activity>,
    #[serde(default, alias = "updatedItinerary", alias = "new_plan")]
    pub updated_itinerary: Vec<Activity>,
    #[serde(default)]
    pub message: String,
}

impl ActionPlan {
    pub fn outdoor_count(&self) -> usize {
        self.updated_itinerary.iter().filter(|a| a.is_outdoor()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreferenceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_comfortable_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_preferences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_preferences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<String>,
}

impl PreferenceModel {
    pub fn is_empty(&self) -> bool {
        self.max_comfortable_temperature.is_none()
            && self.cuisine_preferences.is_none()
            && self.activity_preferences.is_none()
            && self.budget_level.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LearningRecord {
    #[serde(default)]
    pub updates: Vec<String>,
    /// Named impact scores, 0 - 100.
    #[serde(default)]
    pub impact: BTreeMap<String, f64>,
    #[serde(default)]
    pub preferences: Option<PreferenceModel>,
}

/// Stage-specific data for one run. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "data", rename_all = "snake_case")]
pub enum StagePayload {
    Perception(PerceptionPayload),
    Reasoning(Decision),
    Action(ActionPlan),
    Learning(LearningRecord),
}

impl StagePayload {
    pub fn stage(&self) -> Stage {
        match self {
            StagePayload::Perception(_) => Stage::Perception,
            StagePayload::Reasoning(_) => Stage::Reasoning,
            StagePayload::Action(_) => Stage::Action,
            StagePayload::Learning(_) => Stage::Learning,
        }
    }

    pub fn as_perception(&self) -> Option<&PerceptionPayload> {
        match self {
            StagePayload::Perception(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_decision(&self) -> Option<&Decision> {
        match self {
            StagePayload::Reasoning(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<&ActionPlan> {
        match self {
            StagePayload::Action(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_learning(&self) -> Option<&LearningRecord> {
        match self {
            StagePayload::Learning(l) => Some(l),
            _ => None,
        }
    }
}

/// Status of an upstream data provider, as listed by the visualizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

impl DataSource {
    pub fn new(name: &str, kind: &str, status: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            status: status.to_string(),
        }
    }
}
