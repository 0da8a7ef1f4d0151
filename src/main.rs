//! Helper chat relay server
//!
//! Accepts prompts over HTTP and forwards them to the configured model.

use helper_chat::api::{create_router, AppState};
use helper_chat::config::{env_model_factory, RelayConfig};
use helper_chat::llm::{GenerativeModel, LazyModel};
use helper_chat::relay::RelayService;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helper_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = RelayConfig::from_env();

    // A missing credential is not fatal; requests retry initialization
    let model = match config.build_model() {
        Ok(model) => {
            tracing::info!(model = %model.model_id(), "Model client initialized");
            LazyModel::ready(model)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Model client not initialized; will retry per request");
            LazyModel::new(env_model_factory())
        }
    };

    let relay = RelayService::new(Arc::new(model), config.max_prompt_chars);
    let state = AppState::new(relay);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        max_prompt_chars = config.max_prompt_chars,
        "Helper chat relay listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
