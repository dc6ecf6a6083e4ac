//! Fusion Policy
//!
//! Decision logic only: thresholds in, verdict out.
//! Thresholds live in raw-score space, never in normalized space.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    EMAIL_ANOMALY_THRESHOLD, EMAIL_CLASSIFIER_THRESHOLD, URL_ANOMALY_THRESHOLD,
    URL_CLASSIFIER_THRESHOLD, URL_FALLBACK_CLASSIFIER_THRESHOLD,
};
use crate::logic::error::{AnalysisError, ModelLoadError, PredictionError};
use crate::logic::model::{CalibrationRange, Domain, ModelKey, ModelScore};

// ============================================================================
// DOMAIN POLICY
// ============================================================================

/// Fixed thresholds and calibration of one domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainPolicy {
    pub domain: Domain,
    pub classifier_threshold: f32,
    pub anomaly_threshold: f32,
    /// Classifier-only threshold used when the anomaly detector is
    /// unavailable. `None` means the domain has no fallback path.
    pub fallback_classifier_threshold: Option<f32>,
    pub classifier_range: CalibrationRange,
    pub anomaly_range: CalibrationRange,
}

impl DomainPolicy {
    pub fn url() -> Self {
        Self {
            domain: Domain::Url,
            classifier_threshold: URL_CLASSIFIER_THRESHOLD,
            anomaly_threshold: URL_ANOMALY_THRESHOLD,
            fallback_classifier_threshold: Some(URL_FALLBACK_CLASSIFIER_THRESHOLD),
            classifier_range: CalibrationRange::classifier(),
            anomaly_range: CalibrationRange::url_anomaly(),
        }
    }

    // TODO: the email domain has no fallback threshold; needs a product
    // decision before one is added here.
    pub fn email() -> Self {
        Self {
            domain: Domain::Email,
            classifier_threshold: EMAIL_CLASSIFIER_THRESHOLD,
            anomaly_threshold: EMAIL_ANOMALY_THRESHOLD,
            fallback_classifier_threshold: None,
            classifier_range: CalibrationRange::classifier(),
            anomaly_range: CalibrationRange::email_anomaly(),
        }
    }

    pub fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Url => Self::url(),
            Domain::Email => Self::email(),
        }
    }

    pub fn allows_fallback(&self) -> bool {
        self.fallback_classifier_threshold.is_some()
    }

    /// Full mode: both thresholds must be met
    ///
    /// Neither model flags an input on its own.
    pub fn decide_full(&self, classifier_raw: f32, anomaly_raw: f32) -> Decision {
        Decision {
            is_phishing: classifier_raw >= self.classifier_threshold
                && anomaly_raw >= self.anomaly_threshold,
            fallback_engaged: false,
        }
    }

    /// Fallback mode: classifier alone against the relaxed threshold,
    /// `None` when the domain has no fallback path
    pub fn decide_fallback(&self, classifier_raw: f32) -> Option<Decision> {
        self.fallback_classifier_threshold.map(|threshold| Decision {
            is_phishing: classifier_raw >= threshold,
            fallback_engaged: true,
        })
    }

    /// Fuse the two raw scores; a missing anomaly score selects fallback mode
    pub fn decide(&self, classifier_raw: f32, anomaly_raw: Option<f32>) -> Option<Decision> {
        match anomaly_raw {
            Some(anomaly_raw) => Some(self.decide_full(classifier_raw, anomaly_raw)),
            None => self.decide_fallback(classifier_raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub is_phishing: bool,
    pub fallback_engaged: bool,
}

// ============================================================================
// ANOMALY OUTCOME
// ============================================================================

/// Result of asking the anomaly detector, as data rather than an exception
#[derive(Debug, Clone)]
pub enum AnomalyOutcome {
    Scored(ModelScore),
    Unavailable(UnavailableReason),
}

#[derive(Debug, Clone)]
pub enum UnavailableReason {
    /// Artifact failed to load (cached for the process lifetime)
    LoadFailed(ModelLoadError),
    /// This call's scoring failed; the handle stays usable
    PredictionFailed(PredictionError),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::LoadFailed(e) => write!(f, "load failed: {}", e),
            UnavailableReason::PredictionFailed(e) => write!(f, "prediction failed: {}", e),
        }
    }
}

impl UnavailableReason {
    /// Error surfaced when the domain cannot fall back
    pub fn into_error(self, key: ModelKey) -> AnalysisError {
        match self {
            UnavailableReason::LoadFailed(source) => AnalysisError::ModelUnavailable { key, source },
            UnavailableReason::PredictionFailed(source) => AnalysisError::Prediction { key, source },
        }
    }
}

// ============================================================================
// CONFIDENCE
// ============================================================================

/// Classifier certainty, by distance `d = |p - 0.5|`
///
/// `High` for `d > 0.3`, `Medium` for `0.1 < d <= 0.3`. `Low` (`d <= 0.1`)
/// is an extra band for scores near the decision boundary; consumers that
/// only know `high`/`medium` should treat it like `medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Informational only, derived from the classifier's distance to 0.5
    pub fn from_classifier(classifier_raw: f32) -> Self {
        let distance = (classifier_raw - 0.5).abs();
        if distance > 0.3 {
            Confidence::High
        } else if distance > 0.1 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}
