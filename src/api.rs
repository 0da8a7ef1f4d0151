//! HTTP API for the prompt relay

mod handlers;

pub use handlers::{create_router, CHAT_ROUTE};

use crate::relay::RelayService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

impl AppState {
    pub fn new(relay: RelayService) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}
