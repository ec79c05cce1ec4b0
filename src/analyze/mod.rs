// src/analyze/mod.rs
//! Scoring pipeline: lexicon notes, weather, metrics, composite; plus the
//! long-lived `ScoringService` that owns the optional classifier.

pub mod ai_adapter;
pub mod normalize;
pub mod notes;
pub mod scoring;
pub mod weather;
pub mod weights;

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::counter;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::engine::evaluate_routes;
use crate::route::Route;
use crate::scorecard::Evaluation;

// Re-export convenient types.
pub use crate::analyze::ai_adapter::{Classifier, Prediction, SentimentClassifier};
pub use crate::analyze::normalize::{normalize, NEUTRAL_SCORE};
pub use crate::analyze::notes::{analyze_notes, NoteOverrides};
pub use crate::analyze::scoring::{composite, metric_score, score_route, ScoreInputs};
pub use crate::analyze::weather::analyze_weather;
pub use crate::analyze::weights::{HotReloadWeights, NormalizedWeights, ScoreWeights};

/// Owns the classifier capability and the "already warned" flag, so neither
/// lives in process-wide state. Share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct ScoringService {
    classifier: Classifier,
    warned: AtomicBool,
}

impl ScoringService {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            warned: AtomicBool::new(false),
        }
    }

    /// Lexicon-only service.
    pub fn heuristic() -> Self {
        Self::new(Classifier::Unavailable)
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(ai_adapter::build_classifier(config))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// True once a classifier failure has been logged for this instance.
    pub fn classifier_warning_logged(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }

    /// Pure scoring pass; see [`evaluate_routes`].
    pub fn evaluate(
        &self,
        routes: &[Route],
        weights: &ScoreWeights,
        overrides: Option<&NoteOverrides>,
    ) -> Evaluation {
        evaluate_routes(routes, weights, overrides)
    }

    /// Classify every route's community notes and fold them into per-route
    /// overrides. Routes are processed concurrently, notes within a route one
    /// at a time. Any failure drops that route's override and is logged once
    /// per service; the result may therefore be partial or empty.
    pub async fn build_note_overrides(&self, routes: &[Route]) -> NoteOverrides {
        let mut overrides = NoteOverrides::new();
        let Classifier::Available(classifier) = &self.classifier else {
            return overrides;
        };

        let mut tasks = JoinSet::new();
        for route in routes {
            if route.id.is_empty() {
                continue;
            }
            let notes: Vec<String> = route
                .community_notes()
                .into_iter()
                .map(str::to_string)
                .collect();
            if notes.is_empty() {
                continue;
            }
            let id = route.id.clone();
            let classifier = classifier.clone();
            tasks.spawn(async move {
                let result = ai_adapter::classify_notes(classifier.as_ref(), &notes).await;
                (id, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(predictions))) => {
                    counter!("classifier_notes_total").increment(predictions.len() as u64);
                    if let Some(result) = ai_adapter::aggregate(&predictions) {
                        debug!(route = %id, score = result.score, label = %result.label, "note override built");
                        counter!("note_overrides_total").increment(1);
                        overrides.insert(id, result);
                    }
                }
                Ok((id, Err(e))) => {
                    counter!("classifier_errors_total").increment(1);
                    self.warn_once(&id, &e.to_string());
                }
                Err(e) => {
                    counter!("classifier_errors_total").increment(1);
                    self.warn_once("?", &e.to_string());
                }
            }
        }

        overrides
    }

    /// Classifier overrides (best-effort) followed by a scoring pass.
    pub async fn evaluate_with_classifier(
        &self,
        routes: &[Route],
        weights: &ScoreWeights,
    ) -> Evaluation {
        let overrides = self.build_note_overrides(routes).await;
        self.evaluate(routes, weights, Some(&overrides))
    }

    fn warn_once(&self, route_id: &str, error: &str) {
        if !self.warned.swap(true, Ordering::Relaxed) {
            warn!(
                provider = self.classifier.provider_name(),
                route = route_id,
                error,
                "Sentiment model unavailable; falling back to heuristic scores."
            );
        } else {
            debug!(route = route_id, error, "classifier failed again");
        }
    }
}
