use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the scoring metrics.
    /// Fails if another recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("evaluations_total", "Route sets evaluated");
    describe_counter!("routes_scored_total", "Individual routes scored");
    describe_histogram!(
        "evaluate_duration_ms",
        Unit::Milliseconds,
        "Time spent scoring one route set"
    );
    describe_counter!("classifier_notes_total", "Community notes sent to the classifier");
    describe_counter!(
        "classifier_errors_total",
        "Routes whose classification failed and fell back to the lexicon"
    );
    describe_counter!("note_overrides_total", "Classifier note overrides produced");
}
