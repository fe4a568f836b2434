/*!
 * Pipeline progress reporting.
 *
 * Every stage of the pipeline owns a fixed slice of the overall 0-100 range.
 * Stages only ever report a fraction of their own work; this module maps
 * that fraction onto the absolute percentage shown to the user.
 */

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Named phases of the full pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Ingest,
    Transcribe,
    Romanize,
    Translate,
    Export,
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 5] = [
        Stage::Ingest,
        Stage::Transcribe,
        Stage::Romanize,
        Stage::Translate,
        Stage::Export,
    ];

    /// Stage name as used in progress events
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ingest => "Ingest",
            Self::Transcribe => "Transcribe",
            Self::Romanize => "Romanize",
            Self::Translate => "Translate",
            Self::Export => "Export",
        }
    }

    /// Reserved `(start, end)` percentage range of the stage
    pub fn range(&self) -> (u8, u8) {
        match self {
            Self::Ingest => (0, 10),
            Self::Transcribe => (10, 70),
            Self::Romanize => (70, 80),
            Self::Translate => (80, 95),
            Self::Export => (95, 100),
        }
    }

    /// Absolute percentage for a fraction of this stage's work
    pub fn percent(&self, fraction: f64) -> u8 {
        percent_in_range(self.range(), fraction)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| format!("unknown stage: {}", s))
    }
}

/// A single progress update, immutable once emitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// Stage name (one of the [`Stage`] names)
    pub stage: String,
    /// Absolute percent in `[0, 100]`
    pub percent: u8,
    /// Human readable status line
    pub message: String,
    /// Optional extra detail (e.g. "Block 2/5")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProgressEvent {
    /// Build an event for `stage` at `fraction` of that stage's work
    pub fn new(stage: Stage, fraction: f64, message: impl Into<String>) -> Self {
        Self {
            stage: stage.name().to_string(),
            percent: stage.percent(fraction),
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a detail string
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Clamp to `[0, 1]`; NaN counts as no progress.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn percent_in_range((start, end): (u8, u8), fraction: f64) -> u8 {
    let frac = clamp01(fraction);
    let value = f64::from(start) + f64::from(end - start) * frac;
    value.floor() as u8
}

/// Map a 0..1 fraction to the absolute percentage for a stage name.
///
/// Unknown stage names use the full `(0, 100)` range.
pub fn stage_percent(stage: &str, fraction: f64) -> u8 {
    let range = stage.parse::<Stage>().map(|s| s.range()).unwrap_or((0, 100));
    percent_in_range(range, fraction)
}

/// Progress percent for transcription based on elapsed audio time
pub fn transcribe_time_percent(elapsed: f64, total_duration: f64) -> u8 {
    let fraction = if total_duration <= 0.0 {
        0.0
    } else {
        clamp01(elapsed / total_duration)
    };
    Stage::Transcribe.percent(fraction)
}

/// Format seconds as `MM:SS` for status lines
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds as u64 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}
