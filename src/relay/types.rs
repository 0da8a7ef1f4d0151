//! Relay request and response types

use crate::llm::{BlockSignal, SafetyRating};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
///
/// `prompt` is optional so that a missing prompt is reported as empty
/// rather than as a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }
}

/// Relay reply: exactly one of `response` or `error` is present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptResponse {
    Success {
        response: String,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<ErrorDetail>,
    },
}

impl PromptResponse {
    pub fn success(response: impl Into<String>) -> Self {
        Self::Success {
            response: response.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            details: None,
        }
    }
}

/// Diagnostic payload attached to a failure; `None` on the response means no detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorDetail {
    #[serde(rename_all = "camelCase")]
    Block {
        finish_reason: String,
        safety_ratings: Vec<SafetyRating>,
    },
}

impl From<&BlockSignal> for ErrorDetail {
    fn from(signal: &BlockSignal) -> Self {
        ErrorDetail::Block {
            finish_reason: signal.finish_reason.clone(),
            safety_ratings: signal.safety_ratings.clone(),
        }
    }
}
