//! Error taxonomy for the decision engine
//!
//! Each failure family has its own type so callers can tell
//! "bad input" from "model unavailable" from "scoring failed".

use std::path::PathBuf;

use thiserror::Error;

use super::features::layout::LayoutMismatchError;
use super::model::ModelKey;

/// Caller input is structurally invalid before extraction begins
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("URL is required")]
    EmptyUrl,
}

/// A required field is structurally absent from the input record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
}

/// Artifact could not be turned into a model handle
///
/// `Clone` because the registry caches a failed load and hands the same
/// error to every later caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelLoadError {
    #[error("no artifact configured for {0}")]
    NotConfigured(ModelKey),

    #[error("model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("corrupt model {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("model {} was trained on another feature layout: {source}", .path.display())]
    LayoutMismatch {
        path: PathBuf,
        #[source]
        source: LayoutMismatchError,
    },

    #[error("failed to read {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
}

/// Scoring failed; the handle stays usable for later calls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("model {model} cannot score a {actual} feature vector")]
    DomainMismatch { model: ModelKey, actual: &'static str },

    #[error("feature shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("unexpected model output: {0}")]
    UnexpectedOutput(String),

    #[error("non-finite score: {0}")]
    NonFinite(f32),

    #[error("inference failed: {0}")]
    Runtime(String),
}

/// How the hosting layer should treat a failed analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Client gave bad input
    ClientInput,
    /// A required model is not loaded
    ModelUnavailable,
    /// Scoring failed inside the engine
    Internal,
}

/// Failure of a single analysis call
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{key} unavailable: {source}")]
    ModelUnavailable {
        key: ModelKey,
        #[source]
        source: ModelLoadError,
    },

    #[error("{key} prediction failed: {source}")]
    Prediction {
        key: ModelKey,
        #[source]
        source: PredictionError,
    },
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::Validation(_) | AnalysisError::Extraction(_) => ErrorCategory::ClientInput,
            AnalysisError::ModelUnavailable { .. } => ErrorCategory::ModelUnavailable,
            AnalysisError::Prediction { .. } => ErrorCategory::Internal,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::ClientInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::{Domain, ModelKind};

    #[test]
    fn test_error_categories() {
        let key = ModelKey::new(ModelKind::Classifier, Domain::Url);

        assert_eq!(
            AnalysisError::from(ValidationError::EmptyUrl).category(),
            ErrorCategory::ClientInput
        );
        assert_eq!(
            AnalysisError::from(ExtractionError::MissingField("body")).category(),
            ErrorCategory::ClientInput
        );
        assert_eq!(
            AnalysisError::ModelUnavailable {
                key,
                source: ModelLoadError::NotFound(PathBuf::from("x.onnx")),
            }
            .category(),
            ErrorCategory::ModelUnavailable
        );
        assert_eq!(
            AnalysisError::Prediction {
                key,
                source: PredictionError::NonFinite(f32::NAN),
            }
            .category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ExtractionError::MissingField("body");
        assert_eq!(err.to_string(), "required field 'body' is missing");

        let err = ModelLoadError::NotFound(PathBuf::from("models/a.onnx"));
        assert_eq!(err.to_string(), "model not found: models/a.onnx");

        let key = ModelKey::new(ModelKind::AnomalyDetector, Domain::Email);
        let err = AnalysisError::ModelUnavailable {
            key,
            source: ModelLoadError::NotConfigured(key),
        };
        assert!(err.to_string().contains("email autoencoder"));
    }
}
