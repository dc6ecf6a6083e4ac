//! ONNX Runtime backends
//!
//! Both model families are exported to ONNX and run through `ort`:
//! - classifier: gradient-boosted trees (XGBoost for URLs, LightGBM for emails),
//!   exported without ZipMap so probabilities come back as an f32 tensor
//! - anomaly detector: dense autoencoder; the handle computes the MSE between
//!   the input and the reconstruction

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;

use super::handle::{check_finite, check_input, ModelHandle, ModelKey, ModelKind, ModelMetadata, ModelScore};
use super::registry::ModelLoader;
use crate::constants::{CHECKSUM_SIDECAR_EXT, LAYOUT_SIDECAR_EXT};
use crate::logic::config::EngineConfig;
use crate::logic::error::{ModelLoadError, PredictionError};
use crate::logic::features::{FeatureVector, LayoutInfo};

// ============================================================================
// ARTIFACT LOADING
// ============================================================================

fn sidecar(artifact: &Path, ext: &str) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Path of the optional checksum sidecar, e.g. `model.onnx.sha256`
pub fn checksum_sidecar(artifact: &Path) -> PathBuf {
    sidecar(artifact, CHECKSUM_SIDECAR_EXT)
}

/// Path of the optional layout stamp, e.g. `model.onnx.json`
pub fn layout_sidecar(artifact: &Path) -> PathBuf {
    sidecar(artifact, LAYOUT_SIDECAR_EXT)
}

/// Check the artifact's layout stamp against the current layout of its domain
///
/// No stamp means nothing to check (`Ok(None)`).
pub fn read_layout_stamp(key: ModelKey, artifact: &Path) -> Result<Option<LayoutInfo>, ModelLoadError> {
    let path = layout_sidecar(artifact);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ModelLoadError::Io {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let stamp: LayoutInfo = serde_json::from_str(&content).map_err(|e| ModelLoadError::Corrupt {
        path: path.clone(),
        reason: format!("Invalid layout stamp: {}", e),
    })?;

    stamp.validate(key.domain).map_err(|source| ModelLoadError::LayoutMismatch {
        path: artifact.to_path_buf(),
        source,
    })?;
    log::debug!("Layout v{} ({:08x}) verified for {}", stamp.version, stamp.hash, key);

    Ok(Some(stamp))
}

/// Read an artifact and verify it against its sidecar, if any
///
/// Returns the raw bytes and their hex SHA-256.
pub fn read_artifact(path: &Path, verify_checksum: bool) -> Result<(Vec<u8>, String), ModelLoadError> {
    if !path.exists() {
        return Err(ModelLoadError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| ModelLoadError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let digest = hex::encode(Sha256::digest(&bytes));

    let sidecar = checksum_sidecar(path);
    if verify_checksum && sidecar.exists() {
        let content = std::fs::read_to_string(&sidecar).map_err(|e| ModelLoadError::Io {
            path: sidecar.clone(),
            reason: e.to_string(),
        })?;

        // Accept both a bare digest and `sha256sum` output ("<digest>  <file>")
        let expected = content.split_whitespace().next().unwrap_or("").to_lowercase();
        if expected != digest {
            return Err(ModelLoadError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected,
                actual: digest,
            });
        }
        log::debug!("Checksum verified for {}", path.display());
    }

    Ok((bytes, digest))
}

fn load_session(
    key: ModelKey,
    path: &Path,
    verify_checksum: bool,
) -> Result<(Session, ModelMetadata), ModelLoadError> {
    log::info!("Loading {} model from: {}", key, path.display());

    let (bytes, sha256) = read_artifact(path, verify_checksum)?;
    let layout = read_layout_stamp(key, path)?;

    let corrupt = |reason: String| ModelLoadError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let session = Session::builder()
        .map_err(|e| corrupt(format!("Session builder error: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| corrupt(format!("Optimization error: {}", e)))?
        .commit_from_memory(&bytes)
        .map_err(|e| corrupt(format!("Load from memory error: {}", e)))?;

    log::info!(
        "{} model loaded ({} bytes, sha256 {})",
        key,
        bytes.len(),
        &sha256[..12]
    );

    let metadata = ModelMetadata {
        key,
        artifact: path.to_path_buf(),
        sha256,
        size_bytes: bytes.len() as u64,
        layout,
        loaded_at: chrono::Utc::now(),
    };

    Ok((session, metadata))
}

/// Run one `[1, n]` input through a session and return the first f32 output
fn run_session(session: &mut Session, features: &FeatureVector) -> Result<Vec<f32>, PredictionError> {
    let input_array = Array2::<f32>::from_shape_vec(
        (1, features.len()),
        features.as_slice().to_vec(),
    ).map_err(|e| PredictionError::Runtime(format!("Array error: {}", e)))?;

    let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
    if output_names.is_empty() {
        return Err(PredictionError::UnexpectedOutput("No output defined".to_string()));
    }

    let input_tensor = Value::from_array(input_array)
        .map_err(|e| PredictionError::Runtime(format!("Tensor error: {}", e)))?;

    let outputs = session.run(ort::inputs![input_tensor])
        .map_err(|e| PredictionError::Runtime(format!("Inference failed: {}", e)))?;

    // Tree exports emit an int64 label before the probability tensor
    for name in &output_names {
        let Some(output) = outputs.get(name.as_str()) else {
            continue;
        };
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return Ok(data.to_vec());
        }
    }

    Err(PredictionError::UnexpectedOutput(format!(
        "no f32 tensor among outputs {:?}",
        output_names
    )))
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Positive-class probability from a classifier output
///
/// A single value is the probability itself; two values are
/// `[p_benign, p_phishing]`.
pub fn positive_class_probability(output: &[f32]) -> Result<f32, PredictionError> {
    match output {
        [p] => check_finite(*p),
        [_, p] => check_finite(*p),
        other => Err(PredictionError::UnexpectedOutput(format!(
            "expected 1 or 2 class scores, got {}",
            other.len()
        ))),
    }
}

pub struct OnnxClassifier {
    key: ModelKey,
    // `Session::run` needs `&mut`; the lock never escapes `score`
    session: Mutex<Session>,
    metadata: ModelMetadata,
}

impl OnnxClassifier {
    pub fn load(key: ModelKey, path: &Path, verify_checksum: bool) -> Result<Self, ModelLoadError> {
        let (session, metadata) = load_session(key, path, verify_checksum)?;
        Ok(Self {
            key,
            session: Mutex::new(session),
            metadata,
        })
    }
}

impl ModelHandle for OnnxClassifier {
    fn key(&self) -> ModelKey {
        self.key
    }

    fn score(&self, features: &FeatureVector) -> Result<ModelScore, PredictionError> {
        check_input(self.key, features)?;

        let output = {
            let mut session = self.session.lock();
            run_session(&mut session, features)?
        };

        let probability = positive_class_probability(&output)?;
        Ok(ModelScore::new(probability, self.key))
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        Some(&self.metadata)
    }
}

// ============================================================================
// AUTOENCODER
// ============================================================================

/// Mean squared error between an input and its reconstruction
pub fn reconstruction_error(input: &[f32], reconstructed: &[f32]) -> Result<f32, PredictionError> {
    if input.len() != reconstructed.len() {
        return Err(PredictionError::ShapeMismatch {
            expected: input.len(),
            actual: reconstructed.len(),
        });
    }
    if input.is_empty() {
        return Err(PredictionError::ShapeMismatch { expected: 1, actual: 0 });
    }

    let sum: f32 = input
        .iter()
        .zip(reconstructed)
        .map(|(original, rebuilt)| (original - rebuilt).powi(2))
        .sum();

    check_finite(sum / input.len() as f32)
}

pub struct OnnxAutoencoder {
    key: ModelKey,
    session: Mutex<Session>,
    metadata: ModelMetadata,
}

impl OnnxAutoencoder {
    pub fn load(key: ModelKey, path: &Path, verify_checksum: bool) -> Result<Self, ModelLoadError> {
        let (session, metadata) = load_session(key, path, verify_checksum)?;
        Ok(Self {
            key,
            session: Mutex::new(session),
            metadata,
        })
    }
}

impl ModelHandle for OnnxAutoencoder {
    fn key(&self) -> ModelKey {
        self.key
    }

    fn score(&self, features: &FeatureVector) -> Result<ModelScore, PredictionError> {
        check_input(self.key, features)?;

        let reconstructed = {
            let mut session = self.session.lock();
            run_session(&mut session, features)?
        };

        let mse = reconstruction_error(features.as_slice(), &reconstructed)?;
        Ok(ModelScore::new(mse, self.key))
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        Some(&self.metadata)
    }
}

// ============================================================================
// LOADER
// ============================================================================

/// Production loader: artifact paths come from `EngineConfig`
pub struct OnnxModelLoader {
    config: EngineConfig,
}

impl OnnxModelLoader {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ModelLoader for OnnxModelLoader {
    fn load(&self, key: ModelKey) -> Result<Arc<dyn ModelHandle>, ModelLoadError> {
        let path = self
            .config
            .artifact_path(key)
            .ok_or(ModelLoadError::NotConfigured(key))?;
        let verify = self.config.verify_checksums;

        let handle: Arc<dyn ModelHandle> = match key.kind {
            ModelKind::Classifier => Arc::new(OnnxClassifier::load(key, &path, verify)?),
            ModelKind::AnomalyDetector => Arc::new(OnnxAutoencoder::load(key, &path, verify)?),
        };
        Ok(handle)
    }
}
