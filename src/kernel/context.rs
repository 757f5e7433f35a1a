use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::stage::Stage;

pub const DEFAULT_LOCATION: &str = "Dubai";

/// Identity of one demo run. Fresh per `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag carried by every in-flight request.
/// A resolution is only accepted if its epoch matches the active run and stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunEpoch {
    pub run_id: RunId,
    pub stage: Stage,
}

/// User-supplied inputs for one run. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    name: String,
    preferences: String,
    location: String,
}

impl RunContext {
    pub fn new(name: impl Into<String>, preferences: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preferences: preferences.into(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preferences(&self) -> &str {
        &self.preferences
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Lowercased preference keywords, split on commas and whitespace.
    /// "Indoor, Cultural" -> ["indoor", "cultural"]
    pub fn preference_keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for word in self
            .preferences
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
        {
            if !keywords.contains(&word) {
                keywords.push(word);
            }
        }
        keywords
    }
}
