//! Feature Vector - Core data structure for model input
//!
//! **Fixed-arity feature vector**
//!
//! A `FeatureVector` always holds exactly `domain.feature_count()` values.
//! Every constructor pads with trailing zeros or truncates, so no
//! variable-length vector can reach a model.

use serde::Serialize;

use super::layout::{feature_index, Domain};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    domain: Domain,
    values: Vec<f32>,
}

impl FeatureVector {
    /// Create a zeroed vector for a domain
    pub fn zeros(domain: Domain) -> Self {
        Self {
            domain,
            values: vec![0.0; domain.feature_count()],
        }
    }

    /// Create from raw values (truncates or pads with zeros if wrong size)
    pub fn from_vec(domain: Domain, mut values: Vec<f32>) -> Self {
        values.resize(domain.feature_count(), 0.0);
        Self { domain, values }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        feature_index(self.domain, name).and_then(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::{EMAIL_FEATURE_COUNT, URL_FEATURE_COUNT};

    #[test]
    fn test_from_vec_pads() {
        let v = FeatureVector::from_vec(Domain::Url, vec![1.0, 2.0]);
        assert_eq!(v.len(), URL_FEATURE_COUNT);
        assert_eq!(v.get(0), Some(1.0));
        assert_eq!(v.get(1), Some(2.0));
        assert!(v.as_slice()[2..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_vec_truncates() {
        let v = FeatureVector::from_vec(Domain::Email, vec![7.0; 64]);
        assert_eq!(v.len(), EMAIL_FEATURE_COUNT);
        assert!(v.as_slice().iter().all(|&x| x == 7.0));
    }

    #[test]
    fn test_zeros_is_valid() {
        for domain in Domain::ALL {
            let v = FeatureVector::zeros(domain);
            assert_eq!(v.len(), domain.feature_count());
            assert_eq!(v.domain(), domain);
        }
    }

    #[test]
    fn test_get_by_name() {
        let mut values = vec![0.0; URL_FEATURE_COUNT];
        values[4] = 3.0;
        let v = FeatureVector::from_vec(Domain::Url, values);
        assert_eq!(v.get_by_name("at_count"), Some(3.0));
        assert_eq!(v.get_by_name("body_length"), None);
    }
}
