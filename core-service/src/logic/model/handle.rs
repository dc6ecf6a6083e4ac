//! Model Handle - the single scoring seam
//!
//! A handle owns one loaded, immutable artifact. The decision engine only
//! ever sees `dyn ModelHandle`, so ONNX sessions and test stubs are
//! interchangeable.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logic::error::PredictionError;
use crate::logic::features::{Domain, FeatureVector, LayoutInfo};

// ============================================================================
// MODEL IDENTITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Supervised model, outputs a phishing probability
    Classifier,
    /// Autoencoder, outputs a reconstruction error
    AnomalyDetector,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Classifier, ModelKind::AnomalyDetector];
}

/// One model slot: kind × domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelKey {
    pub kind: ModelKind,
    pub domain: Domain,
}

impl ModelKey {
    pub const fn new(kind: ModelKind, domain: Domain) -> Self {
        Self { kind, domain }
    }

    pub const fn classifier(domain: Domain) -> Self {
        Self::new(ModelKind::Classifier, domain)
    }

    pub const fn anomaly(domain: Domain) -> Self {
        Self::new(ModelKind::AnomalyDetector, domain)
    }

    /// Every slot the registry manages
    pub fn all() -> impl Iterator<Item = ModelKey> {
        Domain::ALL
            .into_iter()
            .flat_map(|domain| ModelKind::ALL.into_iter().map(move |kind| ModelKey::new(kind, domain)))
    }

    /// Name used in flat result fields (`<label>_score`)
    pub fn label(self) -> &'static str {
        match (self.kind, self.domain) {
            (ModelKind::Classifier, Domain::Url) => "xgboost",
            (ModelKind::Classifier, Domain::Email) => "lightgbm",
            (ModelKind::AnomalyDetector, _) => "autoencoder",
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain, self.label())
    }
}

// ============================================================================
// SCORE
// ============================================================================

/// Raw output of one scoring call
///
/// `raw` is a probability in [0, 1] for classifiers and a non-negative,
/// unbounded reconstruction error for anomaly detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelScore {
    pub raw: f32,
    pub source: ModelKey,
}

impl ModelScore {
    pub fn new(raw: f32, source: ModelKey) -> Self {
        Self { raw, source }
    }
}

/// Metadata recorded when an artifact is loaded
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub key: ModelKey,
    pub artifact: PathBuf,
    pub sha256: String,
    pub size_bytes: u64,
    /// Layout stamp the artifact shipped with, if any
    pub layout: Option<LayoutInfo>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// HANDLE TRAIT
// ============================================================================

/// Loaded model, shared read-only by all concurrent callers
pub trait ModelHandle: Send + Sync {
    fn key(&self) -> ModelKey;

    /// Score one feature vector of this model's domain
    fn score(&self, features: &FeatureVector) -> Result<ModelScore, PredictionError>;

    fn metadata(&self) -> Option<&ModelMetadata> {
        None
    }
}

/// Reject vectors of the wrong domain or arity before they reach a model
pub fn check_input(key: ModelKey, features: &FeatureVector) -> Result<(), PredictionError> {
    if features.domain() != key.domain {
        return Err(PredictionError::DomainMismatch {
            model: key,
            actual: features.domain().as_str(),
        });
    }

    let expected = key.domain.feature_count();
    if features.len() != expected {
        return Err(PredictionError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }

    Ok(())
}

/// Reject NaN/inf scores at the handle boundary
pub fn check_finite(raw: f32) -> Result<f32, PredictionError> {
    if raw.is_finite() {
        Ok(raw)
    } else {
        Err(PredictionError::NonFinite(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ModelKey::classifier(Domain::Url).label(), "xgboost");
        assert_eq!(ModelKey::classifier(Domain::Email).label(), "lightgbm");
        assert_eq!(ModelKey::anomaly(Domain::Url).label(), "autoencoder");
        assert_eq!(ModelKey::anomaly(Domain::Email).to_string(), "email autoencoder");
    }

    #[test]
    fn test_all_keys() {
        let keys: Vec<_> = ModelKey::all().collect();
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&ModelKey::anomaly(Domain::Email)));
    }

    #[test]
    fn test_check_input_rejects_wrong_domain() {
        let key = ModelKey::classifier(Domain::Url);
        let email_vec = FeatureVector::zeros(Domain::Email);

        assert!(matches!(
            check_input(key, &email_vec),
            Err(PredictionError::DomainMismatch { actual: "email", .. })
        ));
        assert!(check_input(key, &FeatureVector::zeros(Domain::Url)).is_ok());
    }

    #[test]
    fn test_check_finite() {
        assert_eq!(check_finite(0.5), Ok(0.5));
        assert!(check_finite(f32::NAN).is_err());
        assert!(check_finite(f32::INFINITY).is_err());
    }
}
