pub mod confidence;
pub mod html;
pub mod json;
pub mod transcript;
pub mod visualizer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::kernel::request::StageRequest;
use crate::kernel::stage::Stage;
use crate::payload::StagePayload;

pub use confidence::{ConfidenceBand, ConfidenceMeter};
pub use visualizer::Visualizer;

/// Which front-end variant fragments are produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Structured visualization markup.
    #[default]
    Html,
    /// Loading line or pretty JSON per stage.
    JsonDump,
    /// Tool-call transcript: the stage's boundary calls and their responses.
    ToolCalls,
}

impl FromStr for Presentation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Presentation::Html),
            "json" | "json_dump" | "json-dump" => Ok(Presentation::JsonDump),
            "tools" | "tool_calls" | "tool-calls" => Ok(Presentation::ToolCalls),
            other => Err(ConfigError::Invalid {
                key: "presentation".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Stage(Stage),
    DataSources,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Stage(stage) => write!(f, "{}", stage),
            Section::DataSources => f.write_str("Data Sources"),
        }
    }
}

/// One rendered view fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub section: Section,
    pub markup: String,
}

/// PURE FUNCTION: (presentation, stage, payload) -> fragment.
/// `None` means the stage's payload has not resolved yet.
pub fn render(presentation: Presentation, stage: Stage, payload: Option<&StagePayload>) -> Fragment {
    render_exchange(presentation, stage, None, payload)
}

/// As `render`, with the request the stage issued. Only the tool-call
/// transcript shows the request; the other presentations ignore it.
pub fn render_exchange(
    presentation: Presentation,
    stage: Stage,
    request: Option<&StageRequest>,
    payload: Option<&StagePayload>,
) -> Fragment {
    let markup = match presentation {
        Presentation::Html => html::render_stage(stage, payload),
        Presentation::JsonDump => json::render_stage(stage, payload),
        Presentation::ToolCalls => transcript::render_stage(stage, request, payload),
    };
    Fragment {
        section: Section::Stage(stage),
        markup,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    presentation: Presentation,
}

impl Renderer {
    pub fn new(presentation: Presentation) -> Self {
        Self { presentation }
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn render(&self, stage: Stage, request: Option<&StageRequest>, payload: Option<&StagePayload>) -> Fragment {
        render_exchange(self.presentation, stage, request, payload)
    }
}
