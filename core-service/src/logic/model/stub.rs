//! Synthetic models for tests
//!
//! Fixed-score handles and a loader that counts how often each key is loaded.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::handle::{check_input, ModelHandle, ModelKey, ModelScore};
use super::registry::ModelLoader;
use crate::logic::error::{ModelLoadError, PredictionError};
use crate::logic::features::FeatureVector;

#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    /// Always return this raw score
    Score(f32),
    /// Fail the first `failures` calls, then return `score`
    FailFirst { failures: usize, score: f32 },
    /// Every call fails
    AlwaysFail,
    /// Loading the artifact fails
    LoadFailure,
}

pub struct StubModel {
    key: ModelKey,
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubModel {
    pub fn new(key: ModelKey, behavior: StubBehavior) -> Self {
        Self {
            key,
            behavior,
            calls: AtomicUsize::new(0),
        }
    }
}

impl ModelHandle for StubModel {
    fn key(&self) -> ModelKey {
        self.key
    }

    fn score(&self, features: &FeatureVector) -> Result<ModelScore, PredictionError> {
        check_input(self.key, features)?;
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            StubBehavior::Score(raw) => Ok(ModelScore::new(raw, self.key)),
            StubBehavior::FailFirst { failures, score } if call >= failures => {
                Ok(ModelScore::new(score, self.key))
            }
            _ => Err(PredictionError::Runtime("stub failure".to_string())),
        }
    }
}

#[derive(Clone, Default)]
pub struct StubLoader {
    behaviors: HashMap<ModelKey, StubBehavior>,
    load_counts: Arc<Mutex<HashMap<ModelKey, usize>>>,
    delay: Option<Duration>,
}

impl StubLoader {
    /// Loader with no models: every key fails with `NotConfigured`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ModelKey, behavior: StubBehavior) -> Self {
        self.behaviors.insert(key, behavior);
        self
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn load_count(&self, key: ModelKey) -> usize {
        self.load_counts.lock().get(&key).copied().unwrap_or(0)
    }
}

impl ModelLoader for StubLoader {
    fn load(&self, key: ModelKey) -> Result<Arc<dyn ModelHandle>, ModelLoadError> {
        *self.load_counts.lock().entry(key).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        match self.behaviors.get(&key) {
            None => Err(ModelLoadError::NotConfigured(key)),
            Some(StubBehavior::LoadFailure) => Err(ModelLoadError::Corrupt {
                path: PathBuf::from(format!("{}.onnx", key.label())),
                reason: "stub load failure".to_string(),
            }),
            Some(behavior) => Ok(Arc::new(StubModel::new(key, *behavior))),
        }
    }
}
