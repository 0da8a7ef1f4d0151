//! One-time model client initialization
//!
//! The client is built on first use and then shared for the life of the
//! process. A failed build is not remembered: the next caller tries again.

use super::GenerativeModel;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Builds the model client; called until it first succeeds
pub type ModelFactory =
    Box<dyn Fn() -> Result<Arc<dyn GenerativeModel>, InitError> + Send + Sync>;

/// Why the model client could not be built
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("required credential {variable} is not set")]
    MissingCredential { variable: &'static str },
    #[error("failed to build model client: {0}")]
    Client(String),
}

/// Owned, lazily-initialized model handle injected into the relay
pub struct LazyModel {
    factory: ModelFactory,
    cell: OnceCell<Arc<dyn GenerativeModel>>,
}

impl LazyModel {
    pub fn new(factory: ModelFactory) -> Self {
        Self {
            factory,
            cell: OnceCell::new(),
        }
    }

    /// Wrap an already-built model
    pub fn ready(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            factory: Box::new(|| Err(InitError::Client("factory never called".to_string()))),
            cell: OnceCell::new_with(Some(model)),
        }
    }

    /// Get the model, building it first if needed
    pub async fn get(&self) -> Result<Arc<dyn GenerativeModel>, InitError> {
        self.cell
            .get_or_try_init(|| async {
                let model = (self.factory)()?;
                tracing::info!(model = %model.model_id(), "Model client initialized");
                Ok::<_, InitError>(model)
            })
            .await
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
