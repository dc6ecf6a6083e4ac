//! PhishGuard Core - Phishing Inference Decision Engine
//!
//! Classifies a URL or an email as phishing or benign by fusing a supervised
//! classifier probability with an autoencoder reconstruction error.
//!
//! ## Layout
//! - `logic::features` - Deterministic feature extraction (URL, email)
//! - `logic::model` - Model handles, registry, score normalization
//! - `logic::decision` - Threshold fusion, fallback policy, engine status

pub mod constants;
pub mod logic;

pub use logic::config::EngineConfig;
pub use logic::decision::{AnalysisResult, Confidence, DecisionEngine, EngineStatus};
pub use logic::error::{
    AnalysisError, ErrorCategory, ExtractionError, ModelLoadError, PredictionError, ValidationError,
};
pub use logic::features::{
    extract_email_features, extract_url_features, EmailRecord, FeatureVector, LayoutInfo,
};
pub use logic::model::{Domain, ModelKey, ModelKind, ModelRegistry, OnnxModelLoader};
