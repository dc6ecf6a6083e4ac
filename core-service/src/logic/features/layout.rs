//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema of both domains**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The trained classifier and autoencoder of each domain read the vector
//! positionally, so names and order here must match the training pipeline.

use std::fmt;
use std::str::FromStr;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when either layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// DOMAIN
// ============================================================================

/// Kind of artifact being analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Url,
    Email,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Url, Domain::Email];

    /// Fixed input arity of both models of this domain
    pub fn feature_count(self) -> usize {
        match self {
            Domain::Url => URL_FEATURE_COUNT,
            Domain::Email => EMAIL_FEATURE_COUNT,
        }
    }

    /// Feature names in vector order
    pub fn layout(self) -> &'static [&'static str] {
        match self {
            Domain::Url => URL_LAYOUT,
            Domain::Email => EMAIL_LAYOUT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Url => "url",
            Domain::Email => "email",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "url" => Ok(Domain::Url),
            "email" => Ok(Domain::Email),
            other => Err(format!("unknown domain '{}' (expected url or email)", other)),
        }
    }
}

// ============================================================================
// FEATURE LAYOUTS (Authoritative source)
// ============================================================================

/// URL feature names in exact order they appear in the vector
pub const URL_LAYOUT: &[&str] = &[
    // === Structural counts (0-6) ===
    "url_length",              // 0
    "dot_count",               // 1
    "slash_count",             // 2
    "hyphen_count",            // 3
    "at_count",                // 4
    "question_count",          // 5
    "equals_count",            // 6

    // === Indicator flags (7-12) ===
    "has_http",                // 7
    "has_https",               // 8
    "has_www",                 // 9
    "has_com",                 // 10
    "has_net",                 // 11
    "has_org",                 // 12

    // === Derived lengths (13-14) ===
    "first_segment_length",    // 13: text before the first '/'
    "pre_query_length",        // 14: text before the first '?'

    // === Keywords, lower-cased (15-17) ===
    "phish_count",             // 15
    "secure_count",            // 16
    "account_count",           // 17

    // === Shape (18-24) ===
    "starts_with_https",       // 18
    "ampersand_segments",      // 19
    "slash_segments",          // 20
    "is_long",                 // 21: length > 75
    "many_dots",               // 22: more than 3 dots
    "has_hex_marker",          // 23: "0x" present
    "first_segment_has_digit", // 24

    // === Padding (25-29), always zero ===
    "reserved_0",
    "reserved_1",
    "reserved_2",
    "reserved_3",
    "reserved_4",
];

/// Email feature names in exact order they appear in the vector
pub const EMAIL_LAYOUT: &[&str] = &[
    // === Field lengths (0-4) ===
    "sender_length",           // 0
    "receiver_length",         // 1
    "subject_length",          // 2
    "body_length",             // 3
    "url_count",               // 4: provided by the caller

    // === Body character stats (5-8) ===
    "special_char_count",      // 5
    "digit_count",             // 6
    "uppercase_count",         // 7
    "word_token_count",        // 8

    // === Body keyword counts, lower-cased (9-18) ===
    "kw_http",
    "kw_dot_com",
    "kw_click",
    "kw_offer",
    "kw_account",
    "kw_secure",
    "kw_verify",
    "kw_urgent",
    "kw_password",
    "kw_login",

    // === Padding (19), always zero ===
    "reserved_0",
];

/// Total number of URL features
/// IMPORTANT: Must match URL_LAYOUT.len()!
pub const URL_FEATURE_COUNT: usize = 30;

/// Total number of email features
/// IMPORTANT: Must match EMAIL_LAYOUT.len()!
pub const EMAIL_FEATURE_COUNT: usize = 20;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of a domain's feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash(domain: Domain) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);
    hasher.update(domain.as_str().as_bytes());

    for name in domain.layout() {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash for a domain
pub fn layout_hash(domain: Domain) -> u32 {
    compute_layout_hash(domain)
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout stamp of one domain
///
/// Written next to a trained artifact as `<artifact>.json` by the training
/// pipeline, and embedded in audit entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub domain: Domain,
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
}

impl LayoutInfo {
    pub fn current(domain: Domain) -> Self {
        Self {
            domain,
            version: FEATURE_VERSION,
            hash: layout_hash(domain),
            feature_count: domain.feature_count(),
        }
    }

    /// Check this stamp against the current layout of `expected`
    ///
    /// The hash covers the domain name, so another domain's stamp fails too.
    pub fn validate(&self, expected: Domain) -> Result<(), LayoutMismatchError> {
        validate_layout(expected, self.version, self.hash)
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Feature layout mismatch for {domain}: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub domain: Domain,
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(
    domain: Domain,
    incoming_version: u8,
    incoming_hash: u32,
) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash(domain);

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            domain,
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(domain: Domain, name: &str) -> Option<usize> {
    domain.layout().iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_counts() {
        assert_eq!(URL_LAYOUT.len(), URL_FEATURE_COUNT);
        assert_eq!(EMAIL_LAYOUT.len(), EMAIL_FEATURE_COUNT);
        assert_eq!(Domain::Url.feature_count(), 30);
        assert_eq!(Domain::Email.feature_count(), 20);
    }

    #[test]
    fn test_layout_names_unique() {
        for domain in Domain::ALL {
            let layout = domain.layout();
            for (i, name) in layout.iter().enumerate() {
                assert_eq!(feature_index(domain, name), Some(i), "duplicate name {}", name);
            }
        }
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(Domain::Url), compute_layout_hash(Domain::Url));
        assert_ne!(layout_hash(Domain::Url), layout_hash(Domain::Email));
        assert_ne!(layout_hash(Domain::Email), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(Domain::Url, FEATURE_VERSION, layout_hash(Domain::Url)).is_ok());
        assert!(validate_layout(Domain::Url, FEATURE_VERSION + 1, layout_hash(Domain::Url)).is_err());

        let err = validate_layout(Domain::Email, FEATURE_VERSION, layout_hash(Domain::Url))
            .unwrap_err();
        assert_eq!(err.domain, Domain::Email);
        assert_eq!(err.actual_hash, layout_hash(Domain::Url));
    }

    #[test]
    fn test_feature_lookup() {
        assert_eq!(feature_index(Domain::Url, "url_length"), Some(0));
        assert_eq!(feature_index(Domain::Url, "has_hex_marker"), Some(23));
        assert_eq!(feature_index(Domain::Email, "kw_login"), Some(18));
        assert_eq!(feature_index(Domain::Email, "url_length"), None);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current(Domain::Email);
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, EMAIL_FEATURE_COUNT);
        assert!(info.validate(Domain::Email).is_ok());

        // A URL stamp never validates for the email models
        assert!(LayoutInfo::current(Domain::Url).validate(Domain::Email).is_err());

        let stale = LayoutInfo { version: FEATURE_VERSION + 1, ..info.clone() };
        assert!(stale.validate(Domain::Email).is_err());
    }

    #[test]
    fn test_layout_info_json() {
        let info: LayoutInfo = serde_json::from_str(&format!(
            r#"{{"domain": "url", "version": {}, "hash": {}, "feature_count": 30}}"#,
            FEATURE_VERSION,
            layout_hash(Domain::Url)
        ))
        .unwrap();
        assert_eq!(info, LayoutInfo::current(Domain::Url));
    }

    #[test]
    fn test_domain_from_str() {
        assert_eq!("url".parse::<Domain>(), Ok(Domain::Url));
        assert_eq!("EMAIL".parse::<Domain>(), Ok(Domain::Email));
        assert!("sms".parse::<Domain>().is_err());
    }
}
