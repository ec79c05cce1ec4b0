//! # Evaluation Engine
//! Pure, testable entry point that maps `(routes, weights, overrides)` → `Evaluation`.
//! No I/O and no hidden state: the same input always yields the same output.
//!
//! Policy: every route gets a fresh scorecard; the recommendation is the route
//! with the strictly highest composite, the first one winning ties.

use std::time::Instant;

use metrics::{counter, histogram};
use tracing::debug;

use crate::analyze::notes::NoteOverrides;
use crate::analyze::scoring::score_route;
use crate::analyze::weights::ScoreWeights;
use crate::route::Route;
use crate::scorecard::{Evaluation, Recommendation, ScoredRoute};

/// Score every route and pick a recommendation.
pub fn evaluate_routes(
    routes: &[Route],
    weights: &ScoreWeights,
    overrides: Option<&NoteOverrides>,
) -> Evaluation {
    let started = Instant::now();
    let ratios = weights.normalized();

    let scored_routes: Vec<ScoredRoute> = routes
        .iter()
        .map(|r| score_route(r, &ratios, overrides))
        .collect();
    let recommendation = recommend(&scored_routes);

    counter!("evaluations_total").increment(1);
    counter!("routes_scored_total").increment(scored_routes.len() as u64);
    histogram!("evaluate_duration_ms").record(started.elapsed().as_secs_f64() * 1000.0);
    debug!(
        routes = scored_routes.len(),
        recommended = recommendation.as_ref().map(|r| r.route_id.as_str()),
        "routes evaluated"
    );

    Evaluation {
        scored_routes,
        recommendation,
    }
}

/// Highest composite wins; ties keep the earliest route. Empty input → `None`.
pub fn recommend(scored: &[ScoredRoute]) -> Option<Recommendation> {
    let mut best: Option<&ScoredRoute> = None;
    for candidate in scored {
        match best {
            Some(current) if candidate.scorecard.composite <= current.scorecard.composite => {}
            _ => best = Some(candidate),
        }
    }

    best.map(|r| Recommendation {
        route_id: r.route.id.clone(),
        route_name: r.route.name.clone(),
        score: r.scorecard.composite,
        rationale: rationale(r),
    })
}

/// "Notes trend positive (75/100) · Weather looks favorable (86/100)".
pub fn rationale(route: &ScoredRoute) -> String {
    let notes = &route.scorecard.note_sentiment;
    let weather = &route.scorecard.weather_sentiment;
    format!(
        "Notes trend {} ({}/100) · Weather looks {} ({}/100)",
        notes.label.as_str().to_lowercase(),
        notes.score,
        weather.label.as_str().to_lowercase(),
        weather.score
    )
}
