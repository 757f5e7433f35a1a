use super::html::number;

pub const AUTONOMOUS_TEXT: &str = "High confidence: AI can autonomously implement this change.";
pub const APPROVAL_TEXT: &str = "Lower confidence: Human approval recommended before proceeding.";

/// Display band of a confidence value (0 - 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// > 80
    Good,
    /// > 60
    Warn,
    Alert,
}

impl ConfidenceBand {
    pub fn color(self) -> &'static str {
        match self {
            ConfidenceBand::Good => "#4CAF50",
            ConfidenceBand::Warn => "#FFC107",
            ConfidenceBand::Alert => "#F44336",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConfidenceBand::Good => "green",
            ConfidenceBand::Warn => "amber",
            ConfidenceBand::Alert => "red",
        }
    }
}

/// Derived view of a decision's confidence score.
///
/// The band and the autonomy text use different thresholds:
/// colour switches at > 80 and > 60, the text at >= 70.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceMeter {
    pub value: f64,
    pub band: ConfidenceBand,
    pub autonomous: bool,
}

impl ConfidenceMeter {
    /// `confidence` is the raw 0.0 - 1.0 score.
    pub fn from_score(confidence: f64) -> Self {
        let value = confidence * 100.0;
        let band = if value > 80.0 {
            ConfidenceBand::Good
        } else if value > 60.0 {
            ConfidenceBand::Warn
        } else {
            ConfidenceBand::Alert
        };

        Self {
            value,
            band,
            autonomous: value >= 70.0,
        }
    }

    pub fn explanation(&self) -> &'static str {
        if self.autonomous {
            AUTONOMOUS_TEXT
        } else {
            APPROVAL_TEXT
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="confidence-meter">
<div class="confidence-label">AI Confidence in Decision</div>
<div class="confidence-bar-container"><div class="confidence-bar" style="width: {width}%; background-color: {color};"></div></div>
<div class="confidence-value">{value:.0}%</div>
<div class="confidence-explanation">{text}</div>
</div>"#,
            width = number(self.value),
            color = self.band.color(),
            value = self.value,
            text = self.explanation(),
        )
    }
}
