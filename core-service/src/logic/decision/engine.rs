//! Decision Engine
//!
//! One call: `Start → FeaturesExtracted → ClassifierScored →
//! {AnomalyScored | AnomalyUnavailable} → Decided`, or an error.
//! No retries inside a call; the only shared mutable state is the registry's
//! load-once cache.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use super::policy::{AnomalyOutcome, Confidence, DomainPolicy, UnavailableReason};
use super::status::{EngineStats, EngineStatus};
use super::types::{AnalysisResult, ScorePair};
use crate::constants::{APP_VERSION, LOG_PREVIEW_CHARS};
use crate::logic::config::EngineConfig;
use crate::logic::error::{AnalysisError, ValidationError};
use crate::logic::features::{extract_email_features, extract_url_features, EmailRecord, FeatureVector};
use crate::logic::model::{
    CalibrationRange, Domain, ModelKey, ModelKind, ModelRegistry, ModelStatus, NormalizationMode,
    OnnxModelLoader,
};

pub struct DecisionEngine {
    registry: Arc<ModelRegistry>,
    url_policy: DomainPolicy,
    email_policy: DomainPolicy,
    normalization: NormalizationMode,
    stats: EngineStats,
}

impl DecisionEngine {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            url_policy: DomainPolicy::url(),
            email_policy: DomainPolicy::email(),
            normalization: NormalizationMode::default(),
            stats: EngineStats::default(),
        }
    }

    /// Engine backed by ONNX artifacts located by `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        let registry = ModelRegistry::new(OnnxModelLoader::new(config.clone()));
        Self::new(Arc::new(registry)).with_normalization(config.normalization_mode())
    }

    pub fn with_normalization(mut self, mode: NormalizationMode) -> Self {
        self.normalization = mode;
        self
    }

    pub fn with_policy(mut self, policy: DomainPolicy) -> Self {
        match policy.domain {
            Domain::Url => self.url_policy = policy,
            Domain::Email => self.email_policy = policy,
        }
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn policy(&self, domain: Domain) -> &DomainPolicy {
        match domain {
            Domain::Url => &self.url_policy,
            Domain::Email => &self.email_policy,
        }
    }

    // ========================================================================
    // ENTRY POINTS
    // ========================================================================

    /// Analyze a URL. No scheme validation: any non-empty string is scored,
    /// whitespace-only included.
    pub fn analyze_url(&self, url: &str) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();

        if url.is_empty() {
            return self.finish(Err(ValidationError::EmptyUrl.into()), started);
        }

        log::info!("Starting URL analysis for: {}...", preview(url));
        let features = extract_url_features(url);
        self.finish(self.analyze_features(&features), started)
    }

    /// Analyze an email record; `sender` and `body` are required
    pub fn analyze_email(&self, email: &EmailRecord) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();

        log::info!(
            "Starting email analysis from: {}...",
            preview(email.sender.as_deref().unwrap_or(""))
        );
        let result = extract_email_features(email)
            .map_err(AnalysisError::from)
            .and_then(|features| self.analyze_features(&features));
        self.finish(result, started)
    }

    /// Score an already extracted vector and fuse the verdict
    pub fn analyze_features(&self, features: &FeatureVector) -> Result<AnalysisResult, AnalysisError> {
        let domain = features.domain();
        let policy = self.policy(domain);
        log::debug!("Extracted {} {} features", features.len(), domain);

        // Classifier: no fallback exists, every failure is fatal
        let classifier_key = ModelKey::classifier(domain);
        let classifier = self
            .registry
            .get(classifier_key)
            .map_err(|source| AnalysisError::ModelUnavailable { key: classifier_key, source })?;
        let classifier_raw = classifier
            .score(features)
            .map_err(|source| AnalysisError::Prediction { key: classifier_key, source })?
            .raw;
        log::debug!("{} score: {}", classifier_key, classifier_raw);

        let anomaly_key = ModelKey::anomaly(domain);
        let (decision, anomaly_raw) = match self.score_anomaly(anomaly_key, features) {
            AnomalyOutcome::Scored(score) => {
                log::debug!("{} score: {}", anomaly_key, score.raw);
                (policy.decide_full(classifier_raw, score.raw), Some(score.raw))
            }
            AnomalyOutcome::Unavailable(reason) => match policy.decide_fallback(classifier_raw) {
                Some(decision) => {
                    log::warn!("{} unavailable ({}), using classifier fallback", anomaly_key, reason);
                    (decision, None)
                }
                None => return Err(reason.into_error(anomaly_key)),
            },
        };

        let mut scores = BTreeMap::new();
        scores.insert(
            ModelKind::Classifier,
            self.score_pair(&policy.classifier_range, classifier_raw),
        );
        if let Some(raw) = anomaly_raw {
            scores.insert(ModelKind::AnomalyDetector, self.score_pair(&policy.anomaly_range, raw));
        }

        Ok(AnalysisResult {
            domain,
            is_phishing: decision.is_phishing,
            scores,
            fallback_engaged: decision.fallback_engaged,
            confidence: Confidence::from_classifier(classifier_raw),
        })
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Ask the anomaly detector; load and scoring failures become data
    fn score_anomaly(&self, key: ModelKey, features: &FeatureVector) -> AnomalyOutcome {
        let handle = match self.registry.get(key) {
            Ok(handle) => handle,
            Err(e) => return AnomalyOutcome::Unavailable(UnavailableReason::LoadFailed(e)),
        };

        match handle.score(features) {
            Ok(score) => AnomalyOutcome::Scored(score),
            Err(e) => {
                log::warn!("{} prediction failed: {}", key, e);
                AnomalyOutcome::Unavailable(UnavailableReason::PredictionFailed(e))
            }
        }
    }

    fn score_pair(&self, range: &CalibrationRange, raw: f32) -> ScorePair {
        ScorePair {
            raw,
            normalized: self.normalization.apply(range, raw),
        }
    }

    fn finish(
        &self,
        result: Result<AnalysisResult, AnalysisError>,
        started: Instant,
    ) -> Result<AnalysisResult, AnalysisError> {
        match &result {
            Ok(analysis) => {
                self.stats.record_success(analysis, started.elapsed());
                log::info!(
                    "Analysis complete. Is phishing: {} (fallback: {})",
                    analysis.is_phishing,
                    analysis.fallback_engaged
                );
            }
            Err(e) if e.is_client_error() => {
                self.stats.record_failure();
                log::warn!("Rejected analysis input: {}", e);
            }
            Err(e) => {
                self.stats.record_failure();
                log::error!("Error during analysis: {}", e);
            }
        }
        result
    }

    // ========================================================================
    // LIFECYCLE / STATUS
    // ========================================================================

    /// Warm start: load every model now instead of on first request
    pub fn preload(&self) -> Vec<ModelStatus> {
        self.registry.preload()
    }

    pub fn is_ready(&self) -> bool {
        self.registry.is_ready()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            ready: self.registry.is_ready(),
            version: APP_VERSION.to_string(),
            normalization: self.normalization,
            models: self.registry.model_statuses(),
            stats: self.stats.snapshot(),
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
