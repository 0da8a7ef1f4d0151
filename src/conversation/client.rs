//! Transports from the controller to the relay

use crate::api::CHAT_ROUTE;
use crate::relay::{PromptRequest, PromptResponse, RelayService};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

/// Shown when the relay cannot be reached at all
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the server. Please try again.";

/// One prompt in, model text or a user-facing error message out
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn send_prompt(&self, prompt: &str) -> Result<String, String>;
}

#[async_trait]
impl<T: RelayClient + ?Sized> RelayClient for Arc<T> {
    async fn send_prompt(&self, prompt: &str) -> Result<String, String> {
        (**self).send_prompt(prompt).await
    }
}

/// Talks to a relay server over HTTP
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
}

impl HttpRelayClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: format!("{}{CHAT_ROUTE}", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send_prompt(&self, prompt: &str) -> Result<String, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PromptRequest::new(prompt))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Relay unreachable");
                UNREACHABLE_MESSAGE.to_string()
            })?;

        let status = response.status();
        let parsed = response.json::<PromptResponse>().await;

        match parsed {
            Ok(PromptResponse::Success { response }) => Ok(response),
            Ok(PromptResponse::Failure { error, .. }) => Err(error),
            Err(e) if status.is_success() => {
                tracing::warn!(error = %e, "Unreadable relay response");
                Err("Failed to parse server response.".to_string())
            }
            Err(_) => Err(format!("API request failed: {status}")),
        }
    }
}

/// Calls a relay service in-process, through the same body decoding path
pub struct LocalRelayClient {
    relay: Arc<RelayService>,
}

impl LocalRelayClient {
    pub fn new(relay: Arc<RelayService>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl RelayClient for LocalRelayClient {
    async fn send_prompt(&self, prompt: &str) -> Result<String, String> {
        let body = serde_json::to_vec(&PromptRequest::new(prompt)).map_err(|e| e.to_string())?;
        match self.relay.handle(&body).await {
            (_, PromptResponse::Success { response }) => Ok(response),
            (_, PromptResponse::Failure { error, .. }) => Err(error),
        }
    }
}
