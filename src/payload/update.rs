use serde::{Deserialize, Serialize};

use super::activity::Activity;
use super::types::{
    ActionPlan, DataSource, Decision, LearningRecord, PerceptionPayload, PreferenceModel,
    StagePayload,
};

/// Before/after plan pair pushed alongside a decision.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanNotification {
    #[serde(default)]
    pub original_plan: PlanSnapshot,
    #[serde(default)]
    pub new_plan: PlanSnapshot,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanSnapshot {
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Unsolicited server-pushed frame carrying all four stage views at once.
/// Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualizationUpdate {
    #[serde(default)]
    pub context: Option<PerceptionPayload>,
    #[serde(default)]
    pub decision: Option<Decision>,
    #[serde(default)]
    pub notification: Option<PlanNotification>,
    #[serde(default)]
    pub preferences: Option<PreferenceModel>,
    #[serde(default)]
    pub data_sources: Option<Vec<DataSource>>,
}

impl VisualizationUpdate {
    /// Projects the frame onto the four stage payloads.
    /// Absent sections become empty payloads so every sub-render still runs.
    pub fn stage_payloads(&self) -> [StagePayload; 4] {
        let notification = self.notification.clone().unwrap_or_default();

        [
            StagePayload::Perception(self.context.clone().unwrap_or_default()),
            StagePayload::Reasoning(self.decision.clone().unwrap_or_default()),
            StagePayload::Action(ActionPlan {
                original: notification.original_plan.activities,
                updated_itinerary: notification.new_plan.activities,
                message: notification.message.unwrap_or_default(),
            }),
            StagePayload::Learning(LearningRecord {
                updates: Vec::new(),
                impact: Default::default(),
                preferences: self.preferences.clone(),
            }),
        ]
    }
}
