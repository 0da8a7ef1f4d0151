//! Stateless prompt relay
//!
//! Validates a single prompt, forwards it to the model and normalizes the
//! outcome into a [`PromptResponse`]. Nothing is remembered between calls.

mod error;
mod types;

#[cfg(test)]
mod proptests;

pub use error::RelayError;
pub use types::{ErrorDetail, PromptRequest, PromptResponse};

use crate::llm::{Generation, GenerativeModel, LazyModel};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

/// Bytes per prompt character in the worst case (a surrogate pair escaped
/// as two `\uXXXX` sequences)
const MAX_ENCODED_CHAR_BYTES: usize = 12;

/// Room for the JSON framing around the prompt
const BODY_OVERHEAD_BYTES: usize = 1024;

pub struct RelayService {
    model: Arc<LazyModel>,
    max_prompt_chars: usize,
}

impl RelayService {
    pub fn new(model: Arc<LazyModel>, max_prompt_chars: usize) -> Self {
        Self {
            model,
            max_prompt_chars,
        }
    }

    pub fn max_prompt_chars(&self) -> usize {
        self.max_prompt_chars
    }

    /// Largest request body that can still carry a prompt within the limit
    pub fn body_limit(&self) -> usize {
        self.max_prompt_chars
            .saturating_mul(MAX_ENCODED_CHAR_BYTES)
            .saturating_add(BODY_OVERHEAD_BYTES)
    }

    /// Handle one raw request body
    pub async fn handle(&self, body: &[u8]) -> (StatusCode, PromptResponse) {
        match self.prompt(body).await {
            Ok(text) => (StatusCode::OK, PromptResponse::success(text)),
            Err(e) => {
                e.log();
                (e.status(), e.to_response())
            }
        }
    }

    /// Validate and forward one raw request body, returning the model text
    pub async fn prompt(&self, body: &[u8]) -> Result<String, RelayError> {
        let prompt = self.validate(body)?;

        let model = self.model.get().await.map_err(RelayError::Configuration)?;

        match model.generate(&prompt).await.map_err(RelayError::Transport)? {
            Generation::Text(text) => Ok(text),
            Generation::Blocked(signal) => Err(RelayError::ModelBlocked(signal)),
        }
    }

    /// Decode and check the body, returning the prompt exactly as sent
    fn validate(&self, body: &[u8]) -> Result<String, RelayError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| RelayError::InvalidBody)?;
        if !value.is_object() {
            return Err(RelayError::InvalidBody);
        }
        let request: PromptRequest =
            serde_json::from_value(value).map_err(|_| RelayError::InvalidBody)?;

        let prompt = request.prompt.unwrap_or_default();
        if prompt.trim().is_empty() {
            return Err(RelayError::EmptyPrompt);
        }
        if prompt.chars().count() > self.max_prompt_chars {
            return Err(RelayError::PromptTooLong {
                max: self.max_prompt_chars,
            });
        }

        Ok(prompt)
    }
}
