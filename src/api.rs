use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::analyze::weights::{HotReloadWeights, NormalizedWeights, ScoreWeights};
use crate::analyze::ScoringService;
use crate::config::ClassifierConfig;
use crate::demo::demo_routes;
use crate::display::{self, Preference};
use crate::route::{CommunityStats, Route};
use crate::scorecard::{Evaluation, Recommendation, ScoredRoute};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScoringService>,
    pub weights: Arc<HotReloadWeights>,
}

impl AppState {
    pub fn new(service: ScoringService, weights: HotReloadWeights) -> Self {
        Self {
            service: Arc::new(service),
            weights: Arc::new(weights),
        }
    }

    /// Classifier from `config/classifier.json` (or its env override), weights
    /// from `config/weights.json` (or `$SAFECOMMUTE_WEIGHTS_PATH`).
    pub fn from_env() -> Self {
        let config = ClassifierConfig::load_default();
        let service = ScoringService::from_config(&config);
        let weights = HotReloadWeights::new(None);
        info!(
            classifier = service.classifier().provider_name(),
            weights_path = %weights.path().display(),
            "scoring service ready"
        );
        Self::new(service, weights)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/evaluate", post(evaluate))
        .route("/demo", get(demo))
        .route("/weights", get(weights))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct EvaluateReq {
    #[serde(default)]
    routes: Vec<Route>,
    /// Overrides the configured weights for this request only.
    #[serde(default)]
    weights: Option<ScoreWeights>,
    #[serde(default)]
    preference: Preference,
    #[serde(default)]
    classify: bool,
}

#[derive(serde::Deserialize)]
struct DemoQuery {
    #[serde(default)]
    preference: Preference,
}

/// Scored route plus the community stats a UI should display for it.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoredRouteOut {
    #[serde(flatten)]
    scored: ScoredRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_stats: Option<CommunityStats>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResp {
    scored_routes: Vec<ScoredRouteOut>,
    recommendation: Option<Recommendation>,
    /// Route ids ordered by the requested preference.
    ranking: Vec<String>,
    preference: Preference,
    weights: NormalizedWeights,
}

fn respond(evaluation: Evaluation, preference: Preference, weights: &ScoreWeights) -> EvaluateResp {
    let ranking = display::ranking(&evaluation.scored_routes, preference);
    let scored_routes = evaluation
        .scored_routes
        .into_iter()
        .map(|scored| ScoredRouteOut {
            display_stats: display::display_stats(&scored),
            scored,
        })
        .collect();
    EvaluateResp {
        scored_routes,
        recommendation: evaluation.recommendation,
        ranking,
        preference,
        weights: weights.normalized(),
    }
}

async fn evaluate(
    State(state): State<AppState>,
    Json(body): Json<EvaluateReq>,
) -> Json<EvaluateResp> {
    let weights = body.weights.unwrap_or_else(|| state.weights.current());
    let evaluation = if body.classify {
        state
            .service
            .evaluate_with_classifier(&body.routes, &weights)
            .await
    } else {
        state.service.evaluate(&body.routes, &weights, None)
    };
    Json(respond(evaluation, body.preference, &weights))
}

async fn demo(State(state): State<AppState>, Query(q): Query<DemoQuery>) -> Json<EvaluateResp> {
    let weights = state.weights.current();
    let evaluation = state.service.evaluate(&demo_routes(), &weights, None);
    Json(respond(evaluation, q.preference, &weights))
}

async fn weights(State(state): State<AppState>) -> Json<NormalizedWeights> {
    Json(state.weights.current().normalized())
}
