//! Derived scoring output: sentiment results, scorecards and the recommendation.
//!
//! Everything here is recomputed on each scoring pass and never persisted on
//! its own.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::route::Route;

/// Score used when a signal has no data at all. Sits slightly above the
/// midpoint so unreviewed routes are not penalized.
pub const NO_DATA_SCORE: u8 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Caution,
    Unknown,
    Favorable,
    Manageable,
    Risky,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Caution => "Caution",
            SentimentLabel::Unknown => "Unknown",
            SentimentLabel::Favorable => "Favorable",
            SentimentLabel::Manageable => "Manageable",
            SentimentLabel::Risky => "Risky",
        }
    }

    /// Note label for a 0..=100 score: >=70 Positive, <=40 Caution.
    pub fn for_notes(score: f64) -> Self {
        if score >= 70.0 {
            SentimentLabel::Positive
        } else if score <= 40.0 {
            SentimentLabel::Caution
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Weather label for a 0..=100 score: >=70 Favorable, <=40 Risky.
    pub fn for_weather(score: f64) -> Self {
        if score >= 70.0 {
            SentimentLabel::Favorable
        } else if score <= 40.0 {
            SentimentLabel::Risky
        } else {
            SentimentLabel::Manageable
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report counts derived from note classification. Display code merges these
/// with the recorded community stats, never below them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverride {
    pub total_reports: u32,
    pub positive: u32,
    pub negative: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    /// 0..=100.
    pub score: u8,
    pub label: SentimentLabel,
    /// Short, ordered explanations for the UI.
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_override: Option<StatsOverride>,
}

impl SentimentResult {
    pub fn new(score: u8, label: SentimentLabel) -> Self {
        Self {
            score: score.min(100),
            label,
            reasons: Vec::new(),
            stats_override: None,
        }
    }

    /// The no-data result: `{score: 55, label: Unknown}`.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::new(NO_DATA_SCORE, SentimentLabel::Unknown).with_reason(reason)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    pub fn with_stats_override(mut self, stats: StatsOverride) -> Self {
        self.stats_override = Some(stats);
        self
    }
}

/// Display metrics after the note-sentiment tilt. Speed is passed through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedMetrics {
    pub safety: f64,
    pub balance: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    /// Final ranking figure, 0..=100.
    pub composite: u8,
    /// Weighted blend of the base metrics, 0..=100.
    pub metric_score: u8,
    pub note_sentiment: SentimentResult,
    pub weather_sentiment: SentimentResult,
    pub adjusted_metrics: AdjustedMetrics,
}

/// A copy of the input route with its scorecard attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRoute {
    #[serde(flatten)]
    pub route: Route,
    pub scorecard: Scorecard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub route_id: String,
    pub route_name: String,
    pub score: u8,
    pub rationale: String,
}

/// Output of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub scored_routes: Vec<ScoredRoute>,
    pub recommendation: Option<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_thresholds_are_inclusive() {
        assert_eq!(SentimentLabel::for_notes(70.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::for_notes(40.0), SentimentLabel::Caution);
        assert_eq!(SentimentLabel::for_notes(40.5), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::for_weather(70.0), SentimentLabel::Favorable);
        assert_eq!(SentimentLabel::for_weather(40.0), SentimentLabel::Risky);
        assert_eq!(SentimentLabel::for_weather(55.0), SentimentLabel::Manageable);
    }

    #[test]
    fn sentiment_result_shape() {
        let r = SentimentResult::unknown("No community notes available yet.");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["score"], json!(55));
        assert_eq!(v["label"], json!("Unknown"));
        assert!(v.get("statsOverride").is_none());

        let r = r.with_stats_override(StatsOverride {
            total_reports: 3,
            positive: 2,
            negative: 1,
        });
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["statsOverride"]["totalReports"], json!(3));
    }
}
