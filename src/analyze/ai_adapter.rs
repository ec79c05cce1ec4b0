//! Classifier adapter: optional ML sentiment for community notes.
//!
//! The classifier is a capability, not a requirement. `Classifier::Unavailable`
//! means callers stay on the lexicon path; an `Available` classifier that fails
//! at runtime is treated the same way by the scoring service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::classifier::ClassifierConfig;
use crate::scorecard::{SentimentLabel, SentimentResult, StatsOverride};

pub const ENV_TEST_MODE: &str = "CLASSIFIER_TEST_MODE";
const HF_INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";

/// Top label returned by a text classifier ("POSITIVE"/"NEGATIVE") with its
/// probability in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Probability that the text is positive: a negative label maps to `1 - score`.
    pub fn positive_probability(&self) -> f64 {
        let raw = if self.score.is_finite() {
            self.score.clamp(0.0, 1.0)
        } else {
            0.5
        };
        if self.label.to_lowercase().contains("negative") {
            1.0 - raw
        } else {
            raw
        }
    }

    /// Positive probability on the 0..=100 scale, rounded.
    pub fn normalized_score(&self) -> f64 {
        (self.positive_probability() * 100.0).round()
    }

    pub fn is_positive(&self) -> bool {
        self.label.to_uppercase().contains("POSITIVE")
    }
}

/// Anything that can label a single note.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> anyhow::Result<Prediction>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

/// Explicit capability: either a classifier we can call, or none.
#[derive(Clone, Default)]
pub enum Classifier {
    Available(Arc<dyn SentimentClassifier>),
    #[default]
    Unavailable,
}

impl Classifier {
    pub fn available(inner: impl SentimentClassifier + 'static) -> Self {
        Classifier::Available(Arc::new(inner))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Classifier::Available(_))
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Classifier::Available(c) => c.provider_name(),
            Classifier::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Classifier")
            .field(&self.provider_name())
            .finish()
    }
}

/// Factory: build a classifier according to config and environment.
///
/// * `CLASSIFIER_TEST_MODE=mock` → deterministic mock (always POSITIVE 0.9).
/// * `CLASSIFIER_TEST_MODE=error` → a classifier that always fails.
/// * `enabled == false` → `Unavailable`.
/// * provider "huggingface" → Hugging Face Inference API client.
pub fn build_classifier(config: &ClassifierConfig) -> Classifier {
    match std::env::var(ENV_TEST_MODE).as_deref() {
        Ok("mock") => {
            return Classifier::available(MockClassifier::fixed(Prediction::new("POSITIVE", 0.9)))
        }
        Ok("error") => return Classifier::available(FailingClassifier),
        _ => {}
    }

    if !config.enabled {
        info!("sentiment classifier disabled; lexicon scoring only");
        return Classifier::Unavailable;
    }

    match config.provider.as_str() {
        "huggingface" => match HuggingFaceClassifier::new(
            &config.model,
            &config.api_key,
            Duration::from_millis(config.timeout_ms),
        ) {
            Ok(c) => {
                info!(model = %config.model, "sentiment classifier ready");
                Classifier::available(c)
            }
            Err(e) => {
                warn!(error = %e, "sentiment classifier could not be built; lexicon scoring only");
                Classifier::Unavailable
            }
        },
        "mock" => Classifier::available(MockClassifier::fixed(Prediction::new("POSITIVE", 0.9))),
        other => {
            warn!(provider = other, "unknown sentiment classifier provider");
            Classifier::Unavailable
        }
    }
}

// ------------------------------------------------------------
// Providers
// ------------------------------------------------------------

/// Hugging Face Inference API text-classification model
/// (default: distilbert-base-uncased-finetuned-sst-2-english).
pub struct HuggingFaceClassifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HuggingFaceClassifier {
    pub fn new(model: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_endpoint(format!("{HF_INFERENCE_BASE}/{model}"), api_key, timeout)
    }

    /// Point at an explicit inference URL (self-hosted endpoint, tests).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("safecommute/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .context("building classifier http client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> anyhow::Result<Prediction> {
        let mut req = self.http.post(&self.endpoint).json(&json!({ "inputs": text }));
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let resp = req.send().await.context("classifier request failed")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("classifier returned HTTP {status}");
        }
        let body: Value = resp.json().await.context("decoding classifier response")?;
        top_prediction(body)
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}

/// Accepts `[[{label, score}, ...]]` or `[{label, score}, ...]` and returns the
/// highest-scoring entry.
pub fn top_prediction(body: Value) -> anyhow::Result<Prediction> {
    let list = match body {
        Value::Array(mut outer) => {
            if matches!(outer.first(), Some(Value::Array(_))) {
                outer.swap_remove(0)
            } else {
                Value::Array(outer)
            }
        }
        Value::Object(map) => bail!(
            "classifier error: {}",
            map.get("error")
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unexpected response object".to_string())
        ),
        other => bail!("unexpected classifier response: {other}"),
    };
    let preds: Vec<Prediction> =
        serde_json::from_value(list).context("decoding classifier predictions")?;
    preds
        .into_iter()
        .max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| anyhow!("classifier returned no predictions"))
}

/// Returns the same prediction for every note.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    pub fixed: Prediction,
}

impl MockClassifier {
    pub fn fixed(fixed: Prediction) -> Self {
        Self { fixed }
    }
}

#[async_trait]
impl SentimentClassifier for MockClassifier {
    async fn classify(&self, _text: &str) -> anyhow::Result<Prediction> {
        Ok(self.fixed.clone())
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Always errors; models an unreachable model host.
#[derive(Debug, Clone, Copy)]
pub struct FailingClassifier;

#[async_trait]
impl SentimentClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> anyhow::Result<Prediction> {
        Err(anyhow!("sentiment model unavailable"))
    }
    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

// ------------------------------------------------------------
// Per-route classification
// ------------------------------------------------------------

/// Classify notes one at a time. The first failure aborts the route.
pub async fn classify_notes(
    classifier: &dyn SentimentClassifier,
    notes: &[String],
) -> anyhow::Result<Vec<Prediction>> {
    let mut out = Vec::with_capacity(notes.len());
    for note in notes {
        let p = classifier.classify(note).await?;
        debug!(
            target: "classifier",
            note = %anon_hash(note),
            label = %p.label,
            score = p.score,
            "note classified"
        );
        out.push(p);
    }
    Ok(out)
}

/// Fold per-note predictions into one note sentiment. `None` when empty.
pub fn aggregate(predictions: &[Prediction]) -> Option<SentimentResult> {
    if predictions.is_empty() {
        return None;
    }
    let average = predictions
        .iter()
        .map(Prediction::normalized_score)
        .sum::<f64>()
        / predictions.len() as f64;
    let positive = predictions.iter().filter(|p| p.is_positive()).count() as u32;
    let negative = predictions.len() as u32 - positive;

    let score = average.round().clamp(0.0, 100.0) as u8;
    Some(
        SentimentResult::new(score, SentimentLabel::for_notes(average))
            .with_reason(format!(
                "AI sentiment: {positive} positive / {negative} caution"
            ))
            .with_stats_override(StatsOverride {
                total_reports: predictions.len() as u32,
                positive,
                negative,
            }),
    )
}

/// Short SHA-256 prefix so logs can correlate notes without carrying their text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
