//! URL Features
//!
//! Pure structural features of a URL string. No parsing, no network:
//! any string is accepted, missing substrings simply count as zero.

use super::layout::{Domain, URL_FEATURE_COUNT};
use super::text::is_digit;
use super::vector::FeatureVector;

/// URLs longer than this are flagged by `is_long`
const LONG_URL_CHARS: usize = 75;

/// More dots than this are flagged by `many_dots`
const MANY_DOTS: usize = 3;

/// Extract the 30-entry URL feature vector
pub fn extract_url_features(url: &str) -> FeatureVector {
    let lower = url.to_lowercase();
    let length = url.chars().count();
    let dots = url.matches('.').count();

    // Text before the first '/', e.g. "https:" for "https://host/path"
    let first_segment = url.split('/').next().unwrap_or("");
    let pre_query = url.split('?').next().unwrap_or("");

    let mut values = Vec::with_capacity(URL_FEATURE_COUNT);

    values.extend([
        length as f32,
        dots as f32,
        url.matches('/').count() as f32,
        url.matches('-').count() as f32,
        url.matches('@').count() as f32,
        url.matches('?').count() as f32,
        url.matches('=').count() as f32,
    ]);

    values.extend([
        flag(url.contains("http")),
        flag(url.contains("https")),
        flag(url.contains("www")),
        flag(url.contains(".com")),
        flag(url.contains(".net")),
        flag(url.contains(".org")),
    ]);

    values.extend([
        first_segment.chars().count() as f32,
        pre_query.chars().count() as f32,
    ]);

    values.extend([
        lower.matches("phish").count() as f32,
        lower.matches("secure").count() as f32,
        lower.matches("account").count() as f32,
    ]);

    values.extend([
        flag(url.starts_with("https")),
        url.split('&').count() as f32,
        url.split('/').count() as f32,
        flag(length > LONG_URL_CHARS),
        flag(dots > MANY_DOTS),
        flag(url.contains("0x")),
        flag(first_segment.chars().any(is_digit)),
    ]);

    FeatureVector::from_vec(Domain::Url, values)
}

fn flag(condition: bool) -> f32 {
    if condition { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(v: &FeatureVector, name: &str) -> f32 {
        v.get_by_name(name).unwrap_or_else(|| panic!("unknown feature {}", name))
    }

    #[test]
    fn test_phishing_like_url() {
        let url = "https://secure-account.example.com/login?user=1&next=2";
        let v = extract_url_features(url);

        assert_eq!(v.len(), 30);
        assert_eq!(feature(&v, "url_length"), url.len() as f32);
        assert_eq!(feature(&v, "dot_count"), 2.0);
        assert_eq!(feature(&v, "slash_count"), 3.0);
        assert_eq!(feature(&v, "hyphen_count"), 1.0);
        assert_eq!(feature(&v, "question_count"), 1.0);
        assert_eq!(feature(&v, "equals_count"), 2.0);
        assert_eq!(feature(&v, "has_http"), 1.0);
        assert_eq!(feature(&v, "has_https"), 1.0);
        assert_eq!(feature(&v, "has_www"), 0.0);
        assert_eq!(feature(&v, "has_com"), 1.0);
        assert_eq!(feature(&v, "first_segment_length"), 6.0);
        assert_eq!(feature(&v, "pre_query_length"), 40.0);
        assert_eq!(feature(&v, "secure_count"), 1.0);
        assert_eq!(feature(&v, "account_count"), 1.0);
        assert_eq!(feature(&v, "starts_with_https"), 1.0);
        assert_eq!(feature(&v, "ampersand_segments"), 2.0);
        assert_eq!(feature(&v, "slash_segments"), 4.0);
        assert_eq!(feature(&v, "is_long"), 0.0);
    }

    #[test]
    fn test_keyword_counts_ignore_case() {
        let v = extract_url_features("http://PHISH.phish.net/Account");
        assert_eq!(feature(&v, "phish_count"), 2.0);
        assert_eq!(feature(&v, "account_count"), 1.0);
        assert_eq!(feature(&v, "has_net"), 1.0);
        assert_eq!(feature(&v, "starts_with_https"), 0.0);
    }

    #[test]
    fn test_hex_and_digit_markers() {
        let v = extract_url_features("192.168.0.1/0x7f.a.b.c");
        assert_eq!(feature(&v, "has_hex_marker"), 1.0);
        assert_eq!(feature(&v, "first_segment_has_digit"), 1.0);
        assert_eq!(feature(&v, "many_dots"), 1.0);
        assert_eq!(feature(&v, "has_http"), 0.0);
    }

    #[test]
    fn test_long_url_flag() {
        let url = format!("http://example.org/{}", "a".repeat(80));
        let v = extract_url_features(&url);
        assert_eq!(feature(&v, "is_long"), 1.0);
        assert_eq!(feature(&v, "has_org"), 1.0);
    }

    #[test]
    fn test_empty_string() {
        let v = extract_url_features("");
        assert_eq!(v.len(), 30);
        // split() on an empty string still yields one segment
        assert_eq!(feature(&v, "ampersand_segments"), 1.0);
        assert_eq!(feature(&v, "slash_segments"), 1.0);
        assert_eq!(feature(&v, "url_length"), 0.0);
    }

    #[test]
    fn test_padding_is_zero() {
        let v = extract_url_features("https://www.example.com/");
        assert!(v.as_slice()[25..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_first_segment_digit_ignores_fractions() {
        assert_eq!(feature(&extract_url_features("½Ⅻ/x"), "first_segment_has_digit"), 0.0);
        assert_eq!(feature(&extract_url_features("a²/x"), "first_segment_has_digit"), 1.0);
    }

    #[test]
    fn test_non_ascii_lengths_count_chars() {
        let v = extract_url_features("http://пример.рф");
        assert_eq!(feature(&v, "url_length"), 16.0);
    }
}
