//! Model Module - Model handles and their lifecycle
//!
//! Separates loading/caching of artifacts from the decision logic.
//! Backends are swappable behind `ModelHandle` / `ModelLoader`.

pub mod handle;
pub mod normalize;
pub mod onnx;
pub mod registry;

#[cfg(test)]
pub(crate) mod stub;

// Re-export common types
pub use crate::logic::features::Domain;
pub use handle::{ModelHandle, ModelKey, ModelKind, ModelMetadata, ModelScore};
pub use normalize::{CalibrationRange, NormalizationMode};
pub use onnx::{OnnxAutoencoder, OnnxClassifier, OnnxModelLoader};
pub use registry::{ModelLoader, ModelRegistry, ModelState, ModelStatus};
