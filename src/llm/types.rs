//! Common types for model interactions

use serde::{Deserialize, Serialize};

/// Outcome of a generation call that reached the provider
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    /// The model produced text
    Text(String),
    /// The model produced nothing usable; the provider said why
    Blocked(BlockSignal),
}

/// Why a generation came back without text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSignal {
    /// Machine-readable reason, e.g. `SAFETY` or `RECITATION`
    pub finish_reason: String,
    pub safety_ratings: Vec<SafetyRating>,
}

impl BlockSignal {
    pub fn new(finish_reason: impl Into<String>) -> Self {
        Self {
            finish_reason: finish_reason.into(),
            safety_ratings: Vec::new(),
        }
    }

    pub fn with_ratings(mut self, ratings: Vec<SafetyRating>) -> Self {
        self.safety_ratings = ratings;
        self
    }

    /// Human-readable name of the block category
    pub fn category(&self) -> String {
        match self.finish_reason.as_str() {
            "SAFETY" => "safety".to_string(),
            "RECITATION" => "recitation".to_string(),
            "BLOCKLIST" => "blocklisted terms".to_string(),
            "PROHIBITED_CONTENT" => "prohibited content".to_string(),
            "SPII" => "sensitive personal information".to_string(),
            "MAX_TOKENS" => "the output token limit".to_string(),
            "OTHER" | "" => "an unspecified reason".to_string(),
            other => other.to_lowercase().replace('_', " "),
        }
    }
}

/// Per-category safety assessment as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    pub category: String,
    pub probability: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blocked: bool,
}
