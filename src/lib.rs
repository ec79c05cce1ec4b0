// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod demo;
pub mod display;
pub mod engine;
pub mod metrics;
pub mod route;
pub mod scorecard;
pub mod sentiment;

// Scoring pipeline (normalize, notes, weather, scoring, weights, classifier)
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use analyze::ai_adapter;
pub use analyze::{ScoringService, ScoreWeights};
pub use crate::api::{create_router, AppState};
pub use crate::engine::evaluate_routes;
pub use crate::route::Route;
pub use crate::scorecard::{Evaluation, Recommendation, ScoredRoute, SentimentLabel, SentimentResult};

use once_cell::sync::OnceCell;
use shuttle_axum::axum::Router;

pub const ENV_METRICS_ENABLED: &str = "SAFECOMMUTE_METRICS";

static METRICS: OnceCell<metrics::Metrics> = OnceCell::new();

/// Build the full in-process app: scoring routes from env config, plus
/// `/metrics` when `SAFECOMMUTE_METRICS=1`. The Prometheus recorder is
/// installed at most once per process.
pub async fn app() -> anyhow::Result<Router> {
    let router = api::create_router(AppState::from_env());

    let metrics_on = std::env::var(ENV_METRICS_ENABLED)
        .ok()
        .is_some_and(|v| v == "1");
    if !metrics_on {
        return Ok(router);
    }

    let m = METRICS.get_or_try_init(metrics::Metrics::init)?;
    Ok(router.merge(m.router()))
}
