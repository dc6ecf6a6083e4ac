//! Model Registry - lazy, load-once cache of model handles
//!
//! One slot per `ModelKey`. The first `get` of a slot runs the loader;
//! concurrent first callers block on the same `OnceCell` and all observe the
//! single published result. A failed load is cached too and never retried
//! for the lifetime of the registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;

use super::handle::{ModelHandle, ModelKey, ModelKind, ModelMetadata};
use crate::logic::error::ModelLoadError;
use crate::logic::features::Domain;

/// Turns a model key into a loaded handle
pub trait ModelLoader: Send + Sync {
    fn load(&self, key: ModelKey) -> Result<Arc<dyn ModelHandle>, ModelLoadError>;
}

type LoadResult = Result<Arc<dyn ModelHandle>, ModelLoadError>;

/// Lifecycle of one slot: `NotLoaded → Loading → Ready | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    NotLoaded,
    Loading,
    Ready,
    Failed,
}

/// Per-model entry of a status report
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub key: ModelKey,
    pub state: ModelState,
    pub error: Option<String>,
    pub metadata: Option<ModelMetadata>,
}

#[derive(Default)]
struct Slot {
    cell: OnceCell<LoadResult>,
    loading: AtomicBool,
}

pub struct ModelRegistry {
    loader: Box<dyn ModelLoader>,
    slots: [Slot; 4],
}

fn slot_index(key: ModelKey) -> usize {
    let domain = match key.domain {
        Domain::Url => 0,
        Domain::Email => 1,
    };
    let kind = match key.kind {
        ModelKind::Classifier => 0,
        ModelKind::AnomalyDetector => 1,
    };
    domain * 2 + kind
}

impl ModelRegistry {
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slots: Default::default(),
        }
    }

    fn slot(&self, key: ModelKey) -> &Slot {
        &self.slots[slot_index(key)]
    }

    /// Cached handle for `key`, loading it on first access
    pub fn get(&self, key: ModelKey) -> Result<Arc<dyn ModelHandle>, ModelLoadError> {
        let slot = self.slot(key);

        slot.cell
            .get_or_init(|| {
                slot.loading.store(true, Ordering::SeqCst);
                let result = self.loader.load(key);
                match &result {
                    Ok(_) => log::info!("{} ready", key),
                    Err(e) => log::error!("Failed to load {}: {}", key, e),
                }
                slot.loading.store(false, Ordering::SeqCst);
                result
            })
            .clone()
    }

    /// Eagerly load every slot, returning the resulting states
    pub fn preload(&self) -> Vec<ModelStatus> {
        log::info!("Preloading models...");
        for key in ModelKey::all() {
            // Failures are cached in the slot and reported below
            let _ = self.get(key);
        }
        let report = self.model_statuses();
        let ready = report.iter().filter(|s| s.state == ModelState::Ready).count();
        log::info!("Preloading completed: {}/{} models ready", ready, report.len());
        report
    }

    pub fn state(&self, key: ModelKey) -> ModelState {
        let slot = self.slot(key);
        match slot.cell.get() {
            Some(Ok(_)) => ModelState::Ready,
            Some(Err(_)) => ModelState::Failed,
            None if slot.loading.load(Ordering::SeqCst) => ModelState::Loading,
            None => ModelState::NotLoaded,
        }
    }

    /// True only if the model loaded successfully. Never triggers a load.
    pub fn is_model_ready(&self, key: ModelKey) -> bool {
        self.state(key) == ModelState::Ready
    }

    /// A domain can answer as long as its classifier is ready;
    /// the anomaly detector is optional.
    pub fn is_domain_ready(&self, domain: Domain) -> bool {
        self.is_model_ready(ModelKey::classifier(domain))
    }

    /// Every domain's classifier is ready
    pub fn is_ready(&self) -> bool {
        Domain::ALL.into_iter().all(|domain| self.is_domain_ready(domain))
    }

    pub fn model_statuses(&self) -> Vec<ModelStatus> {
        ModelKey::all()
            .map(|key| {
                let cached = self.slot(key).cell.get();
                ModelStatus {
                    key,
                    state: self.state(key),
                    error: cached.and_then(|r| r.as_ref().err()).map(|e| e.to_string()),
                    metadata: cached
                        .and_then(|r| r.as_ref().ok())
                        .and_then(|handle| handle.metadata().cloned()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::stub::{StubBehavior, StubLoader};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_slot_indices_are_distinct() {
        let mut seen: Vec<_> = ModelKey::all().map(slot_index).collect();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_get_returns_identical_handle() {
        let loader = StubLoader::new().with(ModelKey::classifier(Domain::Url), StubBehavior::Score(0.4));
        let registry = ModelRegistry::new(loader.clone());
        let key = ModelKey::classifier(Domain::Url);

        assert_eq!(registry.state(key), ModelState::NotLoaded);

        let first = registry.get(key).unwrap();
        let second = registry.get(key).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.load_count(key), 1);
        assert_eq!(registry.state(key), ModelState::Ready);
    }

    #[test]
    fn test_failure_is_cached_and_not_retried() {
        let loader = StubLoader::new();
        let registry = ModelRegistry::new(loader.clone());
        let key = ModelKey::anomaly(Domain::Url);

        let first = registry.get(key).err();
        let second = registry.get(key).err();

        assert_eq!(first, Some(ModelLoadError::NotConfigured(key)));
        assert_eq!(first, second);
        assert_eq!(loader.load_count(key), 1);
        assert_eq!(registry.state(key), ModelState::Failed);
        assert!(!registry.is_model_ready(key));
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let key = ModelKey::classifier(Domain::Email);
        let loader = StubLoader::new()
            .with(key, StubBehavior::Score(0.1))
            .with_load_delay(Duration::from_millis(50));
        let registry = Arc::new(ModelRegistry::new(loader.clone()));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.get(key).unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(loader.load_count(key), 1);
        for handle in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], handle));
        }
    }

    #[test]
    fn test_readiness() {
        let loader = StubLoader::new()
            .with(ModelKey::classifier(Domain::Url), StubBehavior::Score(0.5))
            .with(ModelKey::classifier(Domain::Email), StubBehavior::Score(0.5));
        let registry = ModelRegistry::new(loader);

        // Probing never loads
        assert!(!registry.is_ready());

        let report = registry.preload();
        assert_eq!(report.len(), 4);

        // Anomaly detectors failed, classifiers are enough
        assert!(registry.is_ready());
        assert!(registry.is_domain_ready(Domain::Url));
        assert_eq!(registry.state(ModelKey::anomaly(Domain::Url)), ModelState::Failed);

        let failed = report
            .iter()
            .find(|s| s.key == ModelKey::anomaly(Domain::Email))
            .unwrap();
        assert!(failed.error.as_deref().unwrap_or("").contains("no artifact configured"));
    }

    #[test]
    fn test_not_ready_without_classifier() {
        let loader = StubLoader::new()
            .with(ModelKey::classifier(Domain::Url), StubBehavior::Score(0.5))
            .with(ModelKey::anomaly(Domain::Email), StubBehavior::Score(3.0));
        let registry = ModelRegistry::new(loader);
        registry.preload();

        assert!(registry.is_domain_ready(Domain::Url));
        assert!(!registry.is_domain_ready(Domain::Email));
        assert!(!registry.is_ready());
    }
}
