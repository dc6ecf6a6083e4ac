//! Analysis result types

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::policy::Confidence;
use crate::logic::features::LayoutInfo;
use crate::logic::model::{Domain, ModelKey, ModelKind};

/// Raw and normalized value of one model score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScorePair {
    pub raw: f32,
    pub normalized: f32,
}

/// Outcome of one analysis call
///
/// `scores` holds only models that actually produced a score: in fallback
/// mode the anomaly entry is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub domain: Domain,
    pub is_phishing: bool,
    pub scores: BTreeMap<ModelKind, ScorePair>,
    pub fallback_engaged: bool,
    /// Informational; never feeds `is_phishing`. See `Confidence` for bands.
    pub confidence: Confidence,
}

impl AnalysisResult {
    pub fn score(&self, kind: ModelKind) -> Option<ScorePair> {
        self.scores.get(&kind).copied()
    }

    pub fn classifier(&self) -> Option<ScorePair> {
        self.score(ModelKind::Classifier)
    }

    pub fn anomaly(&self) -> Option<ScorePair> {
        self.score(ModelKind::AnomalyDetector)
    }

    /// Flat record handed to the HTTP layer
    ///
    /// `<model>_score` is normalized, `original_<model>_score` is raw.
    /// A missing anomaly score is written as `0.0` next to
    /// `autoencoder_fallback: true`.
    pub fn to_flat_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("is_phishing".to_string(), json!(self.is_phishing));

        for kind in ModelKind::ALL {
            let label = ModelKey::new(kind, self.domain).label();
            let pair = self.score(kind).unwrap_or(ScorePair { raw: 0.0, normalized: 0.0 });
            record.insert(format!("{}_score", label), json!(pair.normalized));
            record.insert(format!("original_{}_score", label), json!(pair.raw));
        }

        record.insert("autoencoder_fallback".to_string(), json!(self.fallback_engaged));
        record.insert("confidence".to_string(), json!(self.confidence.as_str()));
        record
    }

    /// Document for an external audit store
    ///
    /// Persisting it is the caller's job.
    pub fn to_log_entry(&self, input: Value) -> Value {
        let mut entry = self.to_flat_record();
        entry.insert("domain".to_string(), json!(self.domain));
        entry.insert("feature_layout".to_string(), json!(LayoutInfo::current(self.domain)));
        entry.insert("input".to_string(), input);
        entry.insert("analysis_id".to_string(), json!(uuid::Uuid::new_v4().to_string()));
        entry.insert("analyzed_at".to_string(), json!(chrono::Utc::now().to_rfc3339()));
        Value::Object(entry)
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_flat_record().serialize(serializer)
    }
}
