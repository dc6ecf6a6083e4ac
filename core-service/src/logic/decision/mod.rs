//! Decision Module - score fusion and the analysis entry points
//!
//! Input: URL or email. Output: `AnalysisResult`.
//! Extraction → scoring → normalization → threshold fusion → verdict.

pub mod engine;
pub mod policy;
pub mod status;
pub mod types;


// Re-export common types
pub use engine::DecisionEngine;
pub use policy::{AnomalyOutcome, Confidence, Decision, DomainPolicy, UnavailableReason};
pub use status::{EngineStats, EngineStatus, StatsSnapshot};
pub use types::{AnalysisResult, ScorePair};
