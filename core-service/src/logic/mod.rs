//! Logic Module - Business Logic & Engines
//!
//! ## Architecture
//! - `features/` - Feature extraction (URL, Email)
//! - `model/` - Model handles, lazy registry, normalization
//! - `decision/` - Fusion rules and the decision engine

pub mod config;
pub mod error;

pub mod features;
pub mod model;
pub mod decision;
