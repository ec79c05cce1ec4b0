//! Map raw signals onto the common 0..=100 scale.

use once_cell::sync::Lazy;
use regex::Regex;

/// Score for a missing or non-finite signal: unknown renders as the midpoint.
pub const NEUTRAL_SCORE: u8 = 50;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"));

/// Linear rescale of `value` from `[min, max]` into 0..=100, clamped and rounded.
///
/// A degenerate range (`max == min`) clamps the raw value directly instead of
/// dividing by zero. Non-finite input yields [`NEUTRAL_SCORE`].
pub fn normalize(value: f64, min: f64, max: f64) -> u8 {
    if !value.is_finite() || !min.is_finite() || !max.is_finite() {
        return NEUTRAL_SCORE;
    }
    if max == min {
        return to_score(value);
    }
    let pct = (value - min) / (max - min) * 100.0;
    to_score(pct)
}

/// Same as [`normalize`] but treats a missing value as unknown.
pub fn normalize_opt(value: Option<f64>, min: f64, max: f64) -> u8 {
    value.map_or(NEUTRAL_SCORE, |v| normalize(v, min, max))
}

/// Round and clamp into 0..=100.
pub fn to_score(x: f64) -> u8 {
    if !x.is_finite() {
        return NEUTRAL_SCORE;
    }
    x.round().clamp(0.0, 100.0) as u8
}

/// Average of every number found in free text ("10 to 15 mph" -> 12.5).
/// Returns `None` when the text holds no number.
pub fn parse_number(text: &str) -> Option<f64> {
    let nums: Vec<f64> = NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();
    if nums.is_empty() {
        return None;
    }
    Some(nums.iter().sum::<f64>() / nums.len() as f64)
}
