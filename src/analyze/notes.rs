//! Community-note sentiment for a single route.
//!
//! Keyword score (sum of lexicon deltas over every note) plus a report term in
//! [-4, 4] from the recorded positive/negative counts, normalized over [-8, 8].

use std::collections::HashMap;

use crate::analyze::normalize::normalize;
use crate::route::Route;
use crate::scorecard::{SentimentLabel, SentimentResult, StatsOverride};
use crate::sentiment::Lexicon;

/// Pre-computed note sentiment keyed by route id (e.g. from the classifier).
pub type NoteOverrides = HashMap<String, SentimentResult>;

pub const NOTE_MIN: f64 = -8.0;
pub const NOTE_MAX: f64 = 8.0;
/// Report sentiment spans [-REPORT_SCALE, REPORT_SCALE].
pub const REPORT_SCALE: f64 = 4.0;

/// Per-note tally: a note with delta >= 1 reads positive, <= -1 negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct NoteBreakdown {
    sum: f64,
    positive: u32,
    negative: u32,
    total: u32,
}

impl NoteBreakdown {
    fn record(&mut self, delta: f64) {
        self.sum += delta;
        if delta <= -1.0 {
            self.negative += 1;
        } else if delta >= 1.0 {
            self.positive += 1;
        }
        self.total += 1;
    }
}

/// Note sentiment for `route`. An override for the route id wins verbatim.
pub fn analyze_notes(route: &Route, overrides: Option<&NoteOverrides>) -> SentimentResult {
    if !route.id.is_empty() {
        if let Some(hit) = overrides.and_then(|m| m.get(&route.id)) {
            return hit.clone();
        }
    }

    let notes = route.community_notes();
    let stats = route.community_stats.clone().unwrap_or_default();
    let total_reports = stats.total_reports.unwrap_or(0);
    if notes.is_empty() && total_reports == 0 {
        return SentimentResult::unknown("No community notes available yet.");
    }

    let lexicon = Lexicon::notes();
    let mut breakdown = NoteBreakdown::default();
    for note in &notes {
        breakdown.record(lexicon.delta(note));
    }

    let existing_pos = stats.positive.unwrap_or(0);
    let existing_neg = stats.negative.unwrap_or(0);
    let combined = breakdown.sum + report_sentiment(existing_pos, existing_neg, total_reports);
    let score = normalize(combined, NOTE_MIN, NOTE_MAX);

    let mut result = SentimentResult::new(score, SentimentLabel::for_notes(score as f64));
    if total_reports > 0 {
        result = result.with_reason(format!(
            "{existing_pos} positive / {existing_neg} caution reports"
        ));
    }
    if !notes.is_empty() {
        let n = notes.len();
        result = result.with_reason(format!(
            "Analyzed {n} note{}",
            if n == 1 { "" } else { "s" }
        ));
    }

    let merged_pos = existing_pos.max(breakdown.positive);
    let merged_neg = existing_neg.max(breakdown.negative);
    let derived_total = if total_reports > 0 {
        total_reports
    } else if merged_pos.saturating_add(merged_neg) > 0 {
        merged_pos.saturating_add(merged_neg)
    } else {
        breakdown.total
    };
    let counts_changed = merged_pos != existing_pos || merged_neg != existing_neg;
    if counts_changed || (total_reports == 0 && derived_total > 0) {
        result = result.with_stats_override(StatsOverride {
            total_reports: derived_total,
            positive: merged_pos,
            negative: merged_neg,
        });
    }

    result
}

/// `(positive - negative) / total`, clamped to [-1, 1], scaled to [-4, 4].
fn report_sentiment(positive: u32, negative: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let delta = positive as f64 - negative as f64;
    (delta / total as f64).clamp(-1.0, 1.0) * REPORT_SCALE
}
