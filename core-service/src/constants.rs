//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Model file names, decision thresholds and calibration ranges live here.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PhishGuard";

// ============================================
// Model artifacts
// ============================================

/// Default directory holding the ONNX artifacts
pub const DEFAULT_MODEL_DIR: &str = "models";

/// URL classifier (XGBoost export)
pub const URL_CLASSIFIER_FILE: &str = "xgboost_model.onnx";

/// URL autoencoder
pub const URL_AUTOENCODER_FILE: &str = "url_autoencoder_model.onnx";

/// Email classifier (LightGBM export)
pub const EMAIL_CLASSIFIER_FILE: &str = "lightgbm_model.onnx";

/// Email autoencoder
pub const EMAIL_AUTOENCODER_FILE: &str = "email_autoencoder_model.onnx";

/// Extension of the optional SHA-256 sidecar next to an artifact
pub const CHECKSUM_SIDECAR_EXT: &str = "sha256";

/// Extension of the optional feature-layout stamp next to an artifact
pub const LAYOUT_SIDECAR_EXT: &str = "json";

// ============================================
// Decision thresholds (raw-score space)
// ============================================

pub const URL_CLASSIFIER_THRESHOLD: f32 = 0.90;
pub const URL_ANOMALY_THRESHOLD: f32 = 50.0;
pub const URL_FALLBACK_CLASSIFIER_THRESHOLD: f32 = 0.70;

pub const EMAIL_CLASSIFIER_THRESHOLD: f32 = 0.005;
pub const EMAIL_ANOMALY_THRESHOLD: f32 = 485.0;

// ============================================
// Calibration ranges (low, high)
// ============================================

pub const CLASSIFIER_RANGE: (f32, f32) = (0.0, 1.0);
pub const URL_ANOMALY_RANGE: (f32, f32) = (0.0, 100.0);
pub const EMAIL_ANOMALY_RANGE: (f32, f32) = (0.0, 1000.0);

/// Logged inputs are cut to this many chars
pub const LOG_PREVIEW_CHARS: usize = 50;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model directory from environment or use default
pub fn get_model_dir() -> PathBuf {
    std::env::var("PHISHGUARD_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR))
}

/// Get an artifact path override from environment
pub fn get_artifact_override(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Check if normalized scores should be clamped to [0, 1]
pub fn is_clamp_enabled() -> bool {
    std::env::var("PHISHGUARD_CLAMP_SCORES")
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

/// Check if artifact checksums should be verified against sidecars
pub fn is_checksum_verification_enabled() -> bool {
    std::env::var("PHISHGUARD_VERIFY_CHECKSUMS")
        .map(|v| parse_flag(&v))
        .unwrap_or(true)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("on"));
    }
}
