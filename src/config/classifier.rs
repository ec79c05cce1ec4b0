// src/config/classifier.rs
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CLASSIFIER_CONFIG_PATH: &str = "config/classifier.json";
pub const ENV_CLASSIFIER_CONFIG_PATH: &str = "SAFECOMMUTE_CLASSIFIER_CONFIG";
pub const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";

fn default_provider() -> String {
    "huggingface".to_string()
}
fn default_model() -> String {
    "distilbert/distilbert-base-uncased-finetuned-sst-2-english".to_string()
}
fn default_timeout_ms() -> u64 {
    8_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub enabled: bool,
    /// "huggingface" | "mock" (case-insensitive)
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from HF_API_TOKEN. Empty is allowed (anonymous, rate limited).
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ClassifierConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: ClassifierConfig = serde_json::from_str(&data)?;

        cfg.provider = cfg.provider.trim().to_lowercase();

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = env::var(ENV_HF_API_TOKEN)
                .map_err(|_| anyhow::anyhow!("Missing {ENV_HF_API_TOKEN} env var"))?;
        }

        if cfg.timeout_ms == 0 {
            cfg.timeout_ms = default_timeout_ms();
        }

        Ok(cfg)
    }

    /// `$SAFECOMMUTE_CLASSIFIER_CONFIG`, then "config/classifier.json".
    /// A missing file means "disabled"; a broken one is logged and disabled.
    pub fn load_default() -> Self {
        let path = env::var(ENV_CLASSIFIER_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CLASSIFIER_CONFIG_PATH));
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "classifier config unusable; classifier disabled");
                Self::default()
            }
        }
    }
}
