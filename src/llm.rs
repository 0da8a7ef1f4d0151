//! Generative model abstraction
//!
//! The relay only needs one capability from a provider: turn a prompt into
//! text, or tell us why it refused.

mod error;
mod gemini;
mod lazy;
mod types;

#[cfg(test)]
pub mod testing;

pub use error::{LlmError, LlmErrorKind};
pub use gemini::GeminiService;
pub use lazy::{InitError, LazyModel, ModelFactory};
pub use types::{BlockSignal, Generation, SafetyRating};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for generative model providers
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a reply for a single prompt, with provider-default parameters
    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: GenerativeModel + ?Sized> GenerativeModel for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        (**self).generate(prompt).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Logging wrapper for generative models
pub struct LoggingModel {
    inner: Arc<dyn GenerativeModel>,
    model_id: String,
}

impl LoggingModel {
    pub fn new(inner: Arc<dyn GenerativeModel>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl GenerativeModel for LoggingModel {
    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(prompt).await;
        let duration = start.elapsed();

        match &result {
            Ok(Generation::Text(text)) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = prompt.chars().count(),
                    reply_chars = text.chars().count(),
                    "Model request completed"
                );
            }
            Ok(Generation::Blocked(signal)) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    finish_reason = %signal.finish_reason,
                    "Model request returned no text"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Model request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
