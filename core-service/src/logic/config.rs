//! Engine configuration
//!
//! Artifact locations and engine switches, read from the environment with
//! defaults from `constants`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::model::{Domain, ModelKey, ModelKind, NormalizationMode};
use crate::constants::{self, EMAIL_AUTOENCODER_FILE, EMAIL_CLASSIFIER_FILE, URL_AUTOENCODER_FILE, URL_CLASSIFIER_FILE};

#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    /// Directory the default artifact names are resolved against
    pub model_dir: PathBuf,

    pub url_classifier: Option<PathBuf>,
    pub url_autoencoder: Option<PathBuf>,
    pub email_classifier: Option<PathBuf>,
    pub email_autoencoder: Option<PathBuf>,

    /// Clamp normalized scores to [0, 1]
    pub clamp_scores: bool,

    /// Verify artifacts against `<artifact>.sha256` sidecars when present
    pub verify_checksums: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_model_dir(constants::DEFAULT_MODEL_DIR)
    }
}

impl EngineConfig {
    /// All four artifacts under `dir` with their default file names
    pub fn with_model_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model_dir: dir.to_path_buf(),
            url_classifier: Some(dir.join(URL_CLASSIFIER_FILE)),
            url_autoencoder: Some(dir.join(URL_AUTOENCODER_FILE)),
            email_classifier: Some(dir.join(EMAIL_CLASSIFIER_FILE)),
            email_autoencoder: Some(dir.join(EMAIL_AUTOENCODER_FILE)),
            clamp_scores: false,
            verify_checksums: true,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::with_model_dir(constants::get_model_dir());

        Self {
            url_classifier: constants::get_artifact_override("PHISHGUARD_URL_CLASSIFIER")
                .or(defaults.url_classifier),
            url_autoencoder: constants::get_artifact_override("PHISHGUARD_URL_AUTOENCODER")
                .or(defaults.url_autoencoder),
            email_classifier: constants::get_artifact_override("PHISHGUARD_EMAIL_CLASSIFIER")
                .or(defaults.email_classifier),
            email_autoencoder: constants::get_artifact_override("PHISHGUARD_EMAIL_AUTOENCODER")
                .or(defaults.email_autoencoder),
            clamp_scores: constants::is_clamp_enabled(),
            verify_checksums: constants::is_checksum_verification_enabled(),
            model_dir: defaults.model_dir,
        }
    }

    /// Artifact locator of a model slot, `None` when disabled
    pub fn artifact_path(&self, key: ModelKey) -> Option<PathBuf> {
        match (key.domain, key.kind) {
            (Domain::Url, ModelKind::Classifier) => self.url_classifier.clone(),
            (Domain::Url, ModelKind::AnomalyDetector) => self.url_autoencoder.clone(),
            (Domain::Email, ModelKind::Classifier) => self.email_classifier.clone(),
            (Domain::Email, ModelKind::AnomalyDetector) => self.email_autoencoder.clone(),
        }
    }

    /// Disable one model slot; loading it then fails with `NotConfigured`
    pub fn without(mut self, key: ModelKey) -> Self {
        let slot = match (key.domain, key.kind) {
            (Domain::Url, ModelKind::Classifier) => &mut self.url_classifier,
            (Domain::Url, ModelKind::AnomalyDetector) => &mut self.url_autoencoder,
            (Domain::Email, ModelKind::Classifier) => &mut self.email_classifier,
            (Domain::Email, ModelKind::AnomalyDetector) => &mut self.email_autoencoder,
        };
        *slot = None;
        self
    }

    pub fn normalization_mode(&self) -> NormalizationMode {
        NormalizationMode::from_clamp_flag(self.clamp_scores)
    }
}
