use std::collections::BTreeMap;

use super::stage::Stage;
use crate::payload::{
    Activity, ActionPlan, DataSource, Decision, DecisionBasis, LearningRecord, Location,
    PerceptionPayload, PreferenceModel, StagePayload, Venue, Weather,
};

/// Literal substitutes used when a live stage request fails.
/// Every literal has the same shape as a live response, so renderers never
/// need to know where a payload came from.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSupplier;

impl FallbackSupplier {
    pub fn new() -> Self {
        Self
    }

    /// Fixed payload for a working stage. None for Idle and Done.
    pub fn supply(&self, stage: Stage) -> Option<StagePayload> {
        match stage {
            Stage::Perception => Some(StagePayload::Perception(Self::perception())),
            Stage::Reasoning => Some(StagePayload::Reasoning(Self::decision())),
            Stage::Action => Some(StagePayload::Action(Self::action())),
            Stage::Learning => Some(StagePayload::Learning(Self::learning())),
            Stage::Idle | Stage::Done => None,
        }
    }

    pub fn weather() -> Weather {
        Weather {
            heat_index: Some("Very High".to_string()),
            forecast: Some("Extreme heat expected throughout the day".to_string()),
            ..Weather::new(44.0, "Sunny")
        }
    }

    pub fn venues() -> Vec<Venue> {
        vec![
            venue("Dubai Museum", "Cultural", 35.0, 4.5, "Medium"),
            venue("Dubai Mall", "Shopping", 0.0, 4.7, "High"),
            venue("Burj Khalifa Observation Deck", "Attraction", 149.0, 4.6, "Medium"),
            venue("IMG World of Adventures", "Entertainment", 249.0, 4.4, "Medium"),
        ]
    }

    /// The traveler's plan before adaptation.
    pub fn itinerary() -> Vec<Activity> {
        vec![
            Activity::new("09:00-10:30", "Breakfast at Hotel", "Burj Al Arab", true)
                .with_category("Food")
                .with_energy(0.2),
            Activity::new("11:00-15:00", "Desert Safari", "Dubai Desert Conservation Reserve", false)
                .with_category("Adventure")
                .with_energy(0.8),
            Activity::new("16:00-18:00", "Relaxation Time", "Hotel", true)
                .with_category("Leisure")
                .with_energy(0.1),
            Activity::new("19:00-21:00", "Dinner Cruise", "Dubai Marina", true)
                .with_category("Food & Entertainment")
                .with_energy(0.3),
        ]
    }

    pub fn perception() -> PerceptionPayload {
        PerceptionPayload {
            weather: Some(Self::weather()),
            venues: Self::venues(),
            itinerary: Self::itinerary(),
            location: Some(Location {
                city: "Dubai".to_string(),
                district: None,
            }),
            time_context: None,
        }
    }

    pub fn decision() -> Decision {
        Decision {
            unsafe_activity: Some("Desert Safari".to_string()),
            unsafe_activities: vec!["Desert Safari".to_string()],
            reason: "Outdoor temperature exceeds safety threshold (44°C)".to_string(),
            basis: DecisionBasis::Weather,
            alternatives: Self::venues(),
            confidence: Some(0.85),
        }
    }

    pub fn action() -> ActionPlan {
        ActionPlan {
            original: Self::itinerary(),
            updated_itinerary: vec![
                Activity::new("09:00 AM", "Hotel Breakfast", "Hotel Restaurant", true)
                    .with_category("Food"),
                Activity::new("11:00 AM", "Dubai Museum Visit", "Al Fahidi Fort", true)
                    .with_category("Cultural")
                    .marked_updated(),
                Activity::new("02:00 PM", "Lunch at Arabian Tea House", "Al Fahidi District", true)
                    .with_category("Food")
                    .marked_updated(),
                Activity::new("04:00 PM", "Dubai Mall & Fountain Show", "Downtown Dubai", true)
                    .with_category("Shopping & Entertainment")
                    .marked_updated(),
                Activity::new("07:00 PM", "Dinner Cruise", "Dubai Marina", true)
                    .with_category("Food & Entertainment"),
            ],
            message: "Itinerary updated due to extreme heat.".to_string(),
        }
    }

    pub fn learning() -> LearningRecord {
        let mut impact = BTreeMap::new();
        impact.insert("weatherAdaptability".to_string(), 85.0);
        impact.insert("culturalPreferenceAccuracy".to_string(), 92.0);
        impact.insert("satisfactionPrediction".to_string(), 90.0);

        LearningRecord {
            updates: vec![
                "Added \"Indoor activities preferred during heat warnings\"".to_string(),
                "Updated cultural venue preference ranking".to_string(),
                "Reinforced budget compliance pattern".to_string(),
            ],
            impact,
            preferences: Some(PreferenceModel {
                max_comfortable_temperature: Some(40.0),
                cuisine_preferences: None,
                activity_preferences: Some(vec!["indoor".to_string(), "cultural".to_string()]),
                budget_level: Some("moderate".to_string()),
            }),
        }
    }

    /// Sources listed when an update does not name its own.
    pub fn data_sources() -> Vec<DataSource> {
        vec![
            DataSource::new("OpenWeatherMap", "Weather", "active"),
            DataSource::new("WeatherAPI", "Weather", "standby"),
            DataSource::new("TripAdvisor", "Attractions", "active"),
            DataSource::new("Dubai Tourism API", "Local Info", "active"),
            DataSource::new("Zomato", "Dining", "active"),
            DataSource::new("Uber", "Transportation", "active"),
        ]
    }
}

fn venue(name: &str, kind: &str, price: f64, rating: f64, crowd_level: &str) -> Venue {
    Venue {
        name: name.to_string(),
        kind: kind.to_string(),
        indoor: true,
        price,
        rating,
        crowd_level: crowd_level.to_string(),
    }
}
