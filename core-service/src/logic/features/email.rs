//! Email Features
//!
//! Length, character and keyword statistics of an email record.
//! `sender` and `body` are required; `receiver` and `subject` count as empty
//! when absent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::layout::{Domain, EMAIL_FEATURE_COUNT};
use super::text::is_digit;
use super::vector::FeatureVector;
use crate::logic::error::ExtractionError;

/// Phishing indicator keywords counted in the lower-cased body, in layout order
pub const BODY_KEYWORDS: [&str; 10] = [
    "http", ".com", "click", "offer", "account", "secure", "verify", "urgent", "password", "login",
];

const SPECIAL_CHARS: &str = "!$%^&*()-_=+[]{};:<>";

/// Alphabetic tokens of two or more letters
static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[a-zA-Z]{2,}\b").expect("word token pattern is valid")
});

/// Email as received from the caller
///
/// Required fields are `Option` so that a structurally absent field surfaces
/// as an `ExtractionError` instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Number of URLs found in the message by the caller
    #[serde(default)]
    pub urls: Option<f32>,
}

impl EmailRecord {
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_urls(mut self, urls: f32) -> Self {
        self.urls = Some(urls);
        self
    }
}

/// Extract the 20-entry email feature vector
pub fn extract_email_features(email: &EmailRecord) -> Result<FeatureVector, ExtractionError> {
    let sender = email.sender.as_deref().ok_or(ExtractionError::MissingField("sender"))?;
    let body = email.body.as_deref().ok_or(ExtractionError::MissingField("body"))?;
    let lower_body = body.to_lowercase();

    let mut values = Vec::with_capacity(EMAIL_FEATURE_COUNT);

    values.extend([
        char_len(Some(sender)),
        char_len(email.receiver.as_deref()),
        char_len(email.subject.as_deref()),
        char_len(Some(body)),
        email.urls.unwrap_or(0.0),
    ]);

    values.extend([
        body.chars().filter(|c| SPECIAL_CHARS.contains(*c)).count() as f32,
        body.chars().filter(|c| is_digit(*c)).count() as f32,
        body.chars().filter(|c| c.is_uppercase()).count() as f32,
        WORD_TOKEN.find_iter(body).count() as f32,
    ]);

    values.extend(
        BODY_KEYWORDS
            .iter()
            .map(|keyword| lower_body.matches(keyword).count() as f32),
    );

    Ok(FeatureVector::from_vec(Domain::Email, values))
}

fn char_len(field: Option<&str>) -> f32 {
    field.map(|s| s.chars().count()).unwrap_or(0) as f32
}
