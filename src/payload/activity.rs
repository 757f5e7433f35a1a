use serde::{Deserialize, Serialize};

/// One time-slotted entry of an itinerary.
///
/// Accepts both wire spellings seen from the backends: `indoor: bool` and
/// `is_outdoor: bool` (and `activity` for the name). Always emits `indoor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActivityRecord")]
pub struct Activity {
    pub time: String,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub location: String,
    pub indoor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_required: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub updated: bool,
}

impl Activity {
    pub fn new(time: &str, name: &str, location: &str, indoor: bool) -> Self {
        Self {
            time: time.to_string(),
            name: name.to_string(),
            category: None,
            location: location.to_string(),
            indoor,
            energy_required: None,
            updated: false,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_energy(mut self, energy_required: f64) -> Self {
        self.energy_required = Some(energy_required);
        self
    }

    pub fn marked_updated(mut self) -> Self {
        self.updated = true;
        self
    }

    pub fn is_outdoor(&self) -> bool {
        !self.indoor
    }
}

#[derive(Deserialize)]
struct ActivityRecord {
    #[serde(default)]
    time: String,
    #[serde(alias = "activity")]
    name: String,
    #[serde(default, rename = "type", alias = "category")]
    category: Option<String>,
    #[serde(default)]
    location: String,
    #[serde(default)]
    indoor: Option<bool>,
    #[serde(default)]
    is_outdoor: Option<bool>,
    #[serde(default)]
    energy_required: Option<f64>,
    #[serde(default)]
    updated: bool,
}

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        // Explicit `indoor` wins; otherwise invert `is_outdoor`; unflagged means indoor.
        let indoor = match (record.indoor, record.is_outdoor) {
            (Some(indoor), _) => indoor,
            (None, Some(outdoor)) => !outdoor,
            (None, None) => true,
        };

        Self {
            time: record.time,
            name: record.name,
            category: record.category,
            location: record.location,
            indoor,
            energy_required: record.energy_required,
            updated: record.updated,
        }
    }
}
