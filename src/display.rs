//! Presentation helpers over scored routes: community-stat merging and
//! preference ranking.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::route::CommunityStats;
use crate::scorecard::{ScoredRoute, StatsOverride};

/// Merge a sentiment stats override into the recorded community stats.
///
/// Positive/negative take the element-wise maximum; the total is the largest
/// of both totals and the merged positive+negative, so nothing is undercounted.
/// Without an override the recorded stats pass through unchanged.
pub fn merge_community_stats(
    recorded: Option<&CommunityStats>,
    stats_override: Option<&StatsOverride>,
) -> Option<CommunityStats> {
    let Some(o) = stats_override else {
        return recorded.cloned();
    };
    let base = recorded.cloned().unwrap_or_default();

    let positive = o.positive.max(base.positive.unwrap_or(0));
    let negative = o.negative.max(base.negative.unwrap_or(0));
    let total = o
        .total_reports
        .max(base.total_reports.unwrap_or(0))
        .max(positive.saturating_add(negative));

    Some(CommunityStats {
        total_reports: Some(total),
        positive: Some(positive),
        negative: Some(negative),
        highlights: base.highlights,
    })
}

/// Community stats to show for a scored route.
pub fn display_stats(route: &ScoredRoute) -> Option<CommunityStats> {
    merge_community_stats(
        route.route.community_stats.as_ref(),
        route.scorecard.note_sentiment.stats_override.as_ref(),
    )
}

/// Rider preference used to order the route list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Safest,
    Balanced,
    Fastest,
}

/// Ranking figure: composite nudged by how far each sentiment sits from 50,
/// plus the metric the preference cares about.
pub fn preference_score(route: &ScoredRoute, preference: Preference) -> f64 {
    let card = &route.scorecard;
    let m = &card.adjusted_metrics;
    let base = card.composite as f64
        + (card.note_sentiment.score as f64 - 50.0) * 0.25
        + (card.weather_sentiment.score as f64 - 50.0) * 0.2;

    match preference {
        Preference::Fastest => base + m.speed * 0.3,
        Preference::Balanced => base + (m.balance * 0.2 + m.safety * 0.2),
        Preference::Safest => base + m.safety * 0.35,
    }
}

/// Stable sort, best first.
pub fn sort_by_preference(routes: &mut [ScoredRoute], preference: Preference) {
    routes.sort_by(|a, b| {
        preference_score(b, preference)
            .partial_cmp(&preference_score(a, preference))
            .unwrap_or(Ordering::Equal)
    });
}

/// Route ids ordered by preference, leaving the input untouched.
pub fn ranking(routes: &[ScoredRoute], preference: Preference) -> Vec<String> {
    let mut sorted = routes.to_vec();
    sort_by_preference(&mut sorted, preference);
    sorted.into_iter().map(|r| r.route.id).collect()
}
