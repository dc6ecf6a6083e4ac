//! Score Normalization
//!
//! Fixed linear min-max mapping from a raw model score to a display scale.
//! Ranges are chosen offline and never re-fit per call.

use serde::{Deserialize, Serialize};

use crate::constants::{CLASSIFIER_RANGE, EMAIL_ANOMALY_RANGE, URL_ANOMALY_RANGE};

/// Fixed `[low, high]` calibration constants of one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRange {
    pub low: f32,
    pub high: f32,
}

impl CalibrationRange {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub const fn from_pair(pair: (f32, f32)) -> Self {
        Self::new(pair.0, pair.1)
    }

    /// Probability output
    pub const fn classifier() -> Self {
        Self::from_pair(CLASSIFIER_RANGE)
    }

    pub const fn url_anomaly() -> Self {
        Self::from_pair(URL_ANOMALY_RANGE)
    }

    pub const fn email_anomaly() -> Self {
        Self::from_pair(EMAIL_ANOMALY_RANGE)
    }

    /// `(raw - low) / (high - low)`, not clamped
    ///
    /// A raw score outside `[low, high]` maps outside `[0, 1]`.
    pub fn normalize(&self, raw: f32) -> f32 {
        (raw - self.low) / (self.high - self.low)
    }

    /// Same mapping, clipped to `[0, 1]`
    pub fn normalize_clamped(&self, raw: f32) -> f32 {
        self.normalize(raw).clamp(0.0, 1.0)
    }
}

/// How normalized scores treat raw values outside the calibration range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMode {
    /// Linear extrapolation (compatible default)
    #[default]
    Linear,
    /// Clip to `[0, 1]`
    Clamped,
}

impl NormalizationMode {
    pub fn from_clamp_flag(clamp: bool) -> Self {
        if clamp {
            NormalizationMode::Clamped
        } else {
            NormalizationMode::Linear
        }
    }

    pub fn apply(self, range: &CalibrationRange, raw: f32) -> f32 {
        match self {
            NormalizationMode::Linear => range.normalize(raw),
            NormalizationMode::Clamped => range.normalize_clamped(raw),
        }
    }
}
