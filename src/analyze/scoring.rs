//! Per-route scorecard: metric blend, composite, and sentiment-tilted display metrics.
//!
//! Composite = notes*w_notes + weather*w_weather + metrics*w_metrics, using
//! normalized weights, rounded into 0..=100.

use crate::analyze::normalize::{to_score, NEUTRAL_SCORE};
use crate::analyze::notes::{analyze_notes, NoteOverrides};
use crate::analyze::weather::analyze_weather;
use crate::analyze::weights::NormalizedWeights;
use crate::route::Route;
use crate::scorecard::{AdjustedMetrics, Scorecard, ScoredRoute, SentimentLabel};

const SAFETY_SHARE: f64 = 0.6;
const BALANCE_SHARE: f64 = 0.25;
const SPEED_SHARE: f64 = 0.15;
/// Balance receives this fraction of the safety tilt.
const BALANCE_TILT_FACTOR: f64 = 0.4;

/// The three sub-scores feeding the composite, each 0..=100.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreInputs {
    pub notes: u8,
    pub weather: u8,
    pub metrics: u8,
}

/// Weighted blend; weights are expected to sum to 1.
pub fn composite(inputs: &ScoreInputs, w: &NormalizedWeights) -> u8 {
    let raw = inputs.notes as f64 * w.notes
        + inputs.weather as f64 * w.weather
        + inputs.metrics as f64 * w.metrics;
    to_score(raw)
}

/// Safety baseline: `metrics.safety`, then the route's `safetyScore`, then neutral.
fn safety_baseline(route: &Route) -> f64 {
    route
        .metrics
        .safety
        .or(route.safety_score)
        .unwrap_or(NEUTRAL_SCORE as f64)
}

/// `round(safety*0.6 + balance*0.25 + speed*0.15)`; missing balance/speed use safety.
pub fn metric_score(route: &Route) -> u8 {
    let safety = safety_baseline(route);
    let balance = route.metrics.balance.unwrap_or(safety);
    let speed = route.metrics.speed.unwrap_or(safety);
    to_score(safety * SAFETY_SHARE + balance * BALANCE_SHARE + speed * SPEED_SHARE)
}

/// Display tilt applied to safety for a given note label.
pub fn sentiment_tilt(label: SentimentLabel) -> f64 {
    match label {
        SentimentLabel::Caution => -12.0,
        SentimentLabel::Neutral => -4.0,
        SentimentLabel::Positive => 3.0,
        _ => 0.0,
    }
}

/// Safety and balance shifted by the note tilt and clamped; speed untouched.
pub fn adjusted_metrics(route: &Route, note_label: SentimentLabel) -> AdjustedMetrics {
    let safety = safety_baseline(route);
    let balance = route.metrics.balance.unwrap_or(safety);
    let speed = route.metrics.speed.unwrap_or(safety);
    let tilt = sentiment_tilt(note_label);
    AdjustedMetrics {
        safety: (safety + tilt).clamp(0.0, 100.0),
        balance: (balance + tilt * BALANCE_TILT_FACTOR).clamp(0.0, 100.0),
        speed,
    }
}

/// Build a fresh scorecard for `route`. Never fails and never mutates input.
pub fn score_route(
    route: &Route,
    weights: &NormalizedWeights,
    overrides: Option<&NoteOverrides>,
) -> ScoredRoute {
    let note_sentiment = analyze_notes(route, overrides);
    let weather_sentiment = analyze_weather(route);
    let metric = metric_score(route);

    let inputs = ScoreInputs {
        notes: note_sentiment.score,
        weather: weather_sentiment.score,
        metrics: metric,
    };
    let scorecard = Scorecard {
        composite: composite(&inputs, weights),
        metric_score: metric,
        adjusted_metrics: adjusted_metrics(route, note_sentiment.label),
        note_sentiment,
        weather_sentiment,
    };

    ScoredRoute {
        route: route.clone(),
        scorecard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::weights::ScoreWeights;

    #[test]
    fn metric_blend() {
        let r = Route::new("a", "A").with_metrics(95.0, 88.0, 72.0);
        // 57 + 22 + 10.8 = 89.8
        assert_eq!(metric_score(&r), 90);
    }

    #[test]
    fn missing_balance_and_speed_fall_back_to_safety() {
        let mut r = Route::new("a", "A");
        r.metrics.safety = Some(80.0);
        assert_eq!(metric_score(&r), 80);

        let mut r = Route::new("a", "A");
        r.safety_score = Some(64.0);
        assert_eq!(metric_score(&r), 64);

        assert_eq!(metric_score(&Route::new("a", "A")), NEUTRAL_SCORE);
    }

    #[test]
    fn tilt_moves_safety_and_part_of_balance() {
        let r = Route::new("a", "A").with_metrics(95.0, 50.0, 70.0);
        let m = adjusted_metrics(&r, SentimentLabel::Caution);
        assert_eq!(m.safety, 83.0);
        assert!((m.balance - 45.2).abs() < 1e-9);
        assert_eq!(m.speed, 70.0);

        let m = adjusted_metrics(&r, SentimentLabel::Positive);
        assert_eq!(m.safety, 98.0);

        let high = Route::new("a", "A").with_metrics(99.0, 99.0, 99.0);
        assert_eq!(adjusted_metrics(&high, SentimentLabel::Positive).safety, 100.0);

        let m = adjusted_metrics(&r, SentimentLabel::Unknown);
        assert_eq!(m.safety, 95.0);
        assert_eq!(m.balance, 50.0);
    }

    #[test]
    fn composite_uses_normalized_weights() {
        let inputs = ScoreInputs {
            notes: 55,
            weather: 55,
            metrics: 90,
        };
        let w = ScoreWeights::default().normalized();
        // 24.75 + 19.25 + 18 = 62
        assert_eq!(composite(&inputs, &w), 62);

        let thirds = ScoreWeights::new(0.0, 0.0, 0.0).normalized();
        // (55 + 55 + 90) / 3 = 66.67
        assert_eq!(composite(&inputs, &thirds), 67);
    }

    #[test]
    fn scoring_does_not_touch_input() {
        let r = Route::new("a", "A")
            .with_metrics(90.0, 80.0, 70.0)
            .with_incident("community", "felt unsafe");
        let before = r.clone();
        let scored = score_route(&r, &ScoreWeights::default().normalized(), None);
        assert_eq!(r, before);
        assert_eq!(scored.route, before);
        // Composite and display safety are different numbers.
        assert_ne!(
            scored.scorecard.composite as f64,
            scored.scorecard.adjusted_metrics.safety
        );
    }
}
