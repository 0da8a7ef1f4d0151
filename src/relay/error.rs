//! Relay failure taxonomy
//!
//! Every failure is caught at the relay boundary and turned into a
//! [`PromptResponse::Failure`]; provider detail goes to the log only.

use super::types::{ErrorDetail, PromptResponse};
use crate::llm::{BlockSignal, InitError, LlmError};
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("No prompt provided")]
    EmptyPrompt,
    #[error("Prompt exceeds maximum length of {max} characters")]
    PromptTooLong { max: usize },
    #[error("Server configuration error: the model client is not configured")]
    Configuration(#[source] InitError),
    #[error("Response blocked due to {}.", .0.category())]
    ModelBlocked(BlockSignal),
    #[error("An unexpected error occurred while contacting the model")]
    Transport(#[source] LlmError),
}

impl RelayError {
    /// Map a body that could not be read; an oversized body can only hold an
    /// oversized prompt
    pub fn from_rejection(rejection: &BytesRejection, max_prompt_chars: usize) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::PromptTooLong {
                max: max_prompt_chars,
            }
        } else {
            RelayError::InvalidBody
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody | RelayError::EmptyPrompt | RelayError::PromptTooLong { .. } => {
                StatusCode::BAD_REQUEST
            }
            RelayError::Configuration(_)
            | RelayError::ModelBlocked(_)
            | RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing body; never includes provider error text
    pub fn to_response(&self) -> PromptResponse {
        match self {
            RelayError::ModelBlocked(signal) => PromptResponse::Failure {
                error: self.to_string(),
                details: Some(ErrorDetail::from(signal)),
            },
            _ => PromptResponse::failure(self.to_string()),
        }
    }

    /// Log at the severity this kind of failure deserves
    pub fn log(&self) {
        match self {
            RelayError::InvalidBody | RelayError::EmptyPrompt | RelayError::PromptTooLong { .. } => {
                tracing::debug!(reason = %self, "Rejected prompt request");
            }
            RelayError::Configuration(e) => {
                tracing::error!(error = %e, "Model client unavailable");
            }
            RelayError::ModelBlocked(signal) => {
                tracing::warn!(
                    finish_reason = %signal.finish_reason,
                    safety_ratings = ?signal.safety_ratings,
                    "Model blocked the response"
                );
            }
            RelayError::Transport(e) => {
                tracing::error!(error = %e.message, kind = ?e.kind, "Model request failed");
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_response())).into_response()
    }
}
