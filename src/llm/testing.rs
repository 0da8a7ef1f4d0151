//! Mock model implementations for testing

use super::{BlockSignal, Generation, GenerativeModel, LlmError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock model that returns queued results
pub struct MockModel {
    results: Mutex<VecDeque<Result<Generation, LlmError>>>,
    model_id: String,
    /// Record of all prompts received
    pub prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_text(&self, text: impl Into<String>) {
        self.results
            .lock()
            .unwrap()
            .push_back(Ok(Generation::Text(text.into())));
    }

    pub fn queue_block(&self, signal: BlockSignal) {
        self.results
            .lock()
            .unwrap()
            .push_back(Ok(Generation::Blocked(signal)));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
