//! Features Module - Feature Extraction Engine
//!
//! Pure functions mapping a domain input to a fixed-length vector.
//! Extraction never touches a model.

pub mod layout;
pub mod text;
pub mod vector;
pub mod url;
pub mod email;


// Re-export common types
pub use layout::{Domain, LayoutInfo, EMAIL_FEATURE_COUNT, URL_FEATURE_COUNT};
pub use vector::FeatureVector;
pub use url::extract_url_features;
pub use email::{extract_email_features, EmailRecord};
