//! Blend weights for notes / weather / metrics, with hot-reload from config/weights.json.
//!
//! JSON shape (any field may be omitted; omitted fields keep their default):
//! {
//!   "notes": 45,
//!   "weather": 35,
//!   "metrics": 20
//! }
//!
//! Weights are relative; they are normalized to sum to 1 before use.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};
use tracing::{info, warn};

pub const DEFAULT_WEIGHTS_PATH: &str = "config/weights.json";
pub const ENV_WEIGHTS_PATH: &str = "SAFECOMMUTE_WEIGHTS_PATH";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub notes: f64,
    pub weather: f64,
    pub metrics: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            notes: 45.0,
            weather: 35.0,
            metrics: 20.0,
        }
    }
}

/// Weights after normalization; always sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NormalizedWeights {
    pub notes: f64,
    pub weather: f64,
    pub metrics: f64,
}

impl ScoreWeights {
    pub fn new(notes: f64, weather: f64, metrics: f64) -> Self {
        Self {
            notes,
            weather,
            metrics,
        }
    }

    /// Negative or non-finite weights count as 0. If nothing is left, each
    /// signal gets an equal third.
    pub fn normalized(&self) -> NormalizedWeights {
        fn c(x: f64) -> f64 {
            if x.is_finite() && x > 0.0 {
                x
            } else {
                0.0
            }
        }
        let (n, w, m) = (c(self.notes), c(self.weather), c(self.metrics));
        let total = n + w + m;
        if total <= 0.0 {
            let third = 1.0 / 3.0;
            return NormalizedWeights {
                notes: third,
                weather: third,
                metrics: third,
            };
        }
        NormalizedWeights {
            notes: n / total,
            weather: w / total,
            metrics: m / total,
        }
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: ScoreWeights,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// Create with a path; `None` means `$SAFECOMMUTE_WEIGHTS_PATH`, then
    /// "config/weights.json".
    pub fn new(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| {
            std::env::var(ENV_WEIGHTS_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEIGHTS_PATH))
        });
        Self {
            path,
            inner: RwLock::new(State {
                weights: ScoreWeights::default(),
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the latest weights, reloading if the config file changed.
    pub fn current(&self) -> ScoreWeights {
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            // No file: keep whatever we have (defaults on first call).
            Err(_) => return self.read_state().weights,
        };

        {
            let guard = self.read_state();
            if guard.last_modified == Some(mtime) {
                return guard.weights;
            }
        }

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if guard.last_modified != Some(mtime) {
            match load_weights_file(&self.path) {
                Ok(w) => {
                    info!(path = %self.path.display(), ?w, "score weights reloaded");
                    guard.weights = w;
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "score weights reload failed; keeping previous");
                }
            }
            guard.last_modified = Some(mtime);
        }
        guard.weights
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Load weights directly (no caching). Public for tests/tools.
pub fn load_weights_file(path: &Path) -> io::Result<ScoreWeights> {
    let bytes = fs::read(path)?;
    let w: ScoreWeights = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(w)
}
