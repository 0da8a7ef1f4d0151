//! Environment configuration

use crate::llm::{GeminiService, GenerativeModel, InitError, LoggingModel, ModelFactory};
use crate::state_machine::SubmissionPolicy;
use std::sync::Arc;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 5000;
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8000";

/// Relay server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Model credential; `None` when unset or blank
    pub api_key: Option<String>,
    pub model: String,
    /// Provider base URL override (gateway or proxy)
    pub base_url: Option<String>,
    pub port: u16,
    pub max_prompt_chars: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            port: DEFAULT_PORT,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_blank(API_KEY_VAR),
            model: non_blank("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_blank("GEMINI_BASE_URL"),
            port: non_blank("HELPER_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_prompt_chars: non_blank("HELPER_MAX_PROMPT_CHARS")
                .and_then(|n| n.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_PROMPT_CHARS),
        }
    }

    /// Build the logged Gemini client this configuration describes
    pub fn build_model(&self) -> Result<Arc<dyn GenerativeModel>, InitError> {
        let api_key = self.api_key.as_deref().ok_or(InitError::MissingCredential {
            variable: API_KEY_VAR,
        })?;
        let service = GeminiService::new(api_key, self.model.as_str(), self.base_url.as_deref())
            .map_err(|e| InitError::Client(e.to_string()))?;
        Ok(Arc::new(LoggingModel::new(Arc::new(service))))
    }
}

/// Factory that re-reads the environment on every attempt
pub fn env_model_factory() -> ModelFactory {
    Box::new(|| RelayConfig::from_env().build_model())
}

/// Terminal client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub relay_url: String,
    pub policy: SubmissionPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            policy: SubmissionPolicy::Serialized,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let serialize = non_blank("HELPER_SERIALIZE_SUBMISSIONS")
            .map_or(true, |v| !matches!(v.trim(), "0" | "false" | "no" | "off"));

        Self {
            relay_url: non_blank("HELPER_RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            policy: if serialize {
                SubmissionPolicy::Serialized
            } else {
                SubmissionPolicy::Overlapping
            },
        }
    }
}
