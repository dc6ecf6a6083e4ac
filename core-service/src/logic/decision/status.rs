//! Engine Status - counters and readiness report

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use super::types::AnalysisResult;
use crate::logic::model::{ModelStatus, NormalizationMode};

/// Lock-free per-engine counters
#[derive(Debug, Default)]
pub struct EngineStats {
    analyses: AtomicU64,
    phishing_verdicts: AtomicU64,
    fallbacks: AtomicU64,
    failures: AtomicU64,
    latency_us_sum: AtomicU64,
}

impl EngineStats {
    pub fn record_success(&self, result: &AnalysisResult, elapsed: Duration) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
        if result.is_phishing {
            self.phishing_verdicts.fetch_add(1, Ordering::Relaxed);
        }
        if result.fallback_engaged {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        self.latency_us_sum
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let analyses = self.analyses.load(Ordering::Relaxed);
        let sum = self.latency_us_sum.load(Ordering::Relaxed);
        let avg = if analyses > 0 { (sum as f32 / analyses as f32) / 1000.0 } else { 0.0 };

        StatsSnapshot {
            analyses,
            phishing_verdicts: self.phishing_verdicts.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub analyses: u64,
    pub phishing_verdicts: u64,
    pub fallbacks: u64,
    pub failures: u64,
    pub avg_latency_ms: f32,
}

/// Engine Status for health checks
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub ready: bool,
    pub version: String,
    pub normalization: NormalizationMode,
    pub models: Vec<ModelStatus>,
    pub stats: StatsSnapshot,
}
