//! HTTP request handlers

use super::AppState;
use crate::relay::{PromptResponse, RelayError};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

/// Route the relay listens on
pub const CHAT_ROUTE: &str = "/api/chat";

/// Create the API router
///
/// The body limit follows the prompt limit instead of axum's default.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.relay.body_limit();
    Router::new()
        .route(CHAT_ROUTE, post(chat))
        .route("/version", get(get_version))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Reads the raw body so decoding failures get the uniform error shape
async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PromptResponse>, RelayError> {
    let result = match body {
        Ok(body) => state.relay.prompt(&body).await,
        Err(rejection) => Err(RelayError::from_rejection(
            &rejection,
            state.relay.max_prompt_chars(),
        )),
    };
    let text = result.inspect_err(RelayError::log)?;
    Ok(Json(PromptResponse::success(text)))
}

async fn get_version() -> &'static str {
    concat!("helper-chat ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockModel;
    use crate::llm::{BlockSignal, LazyModel};
    use crate::relay::RelayService;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(mock: &Arc<MockModel>) -> Router {
        router_with_limit(mock, 100)
    }

    fn router_with_limit(mock: &Arc<MockModel>, max_prompt_chars: usize) -> Router {
        let relay = RelayService::new(Arc::new(LazyModel::ready(mock.clone())), max_prompt_chars);
        create_router(AppState::new(relay))
    }

    async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(CHAT_ROUTE)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn chat_success() {
        let mock = Arc::new(MockModel::new("mock"));
        mock.queue_text("Hi there!");

        let (status, body) = post_chat(router(&mock), r#"{"prompt":"Hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "Hi there!" }));
    }

    #[tokio::test]
    async fn chat_rejects_garbage_in_uniform_shape() {
        let mock = Arc::new(MockModel::new("mock"));

        let (status, body) = post_chat(router(&mock), "{prompt:").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid request body" }));
    }

    #[tokio::test]
    async fn chat_too_long() {
        let mock = Arc::new(MockModel::new("mock"));
        let prompt = "x".repeat(101);

        let (status, body) = post_chat(router(&mock), &json!({ "prompt": prompt }).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("100"));
        assert!(body.get("response").is_none());
        assert!(mock.recorded_prompts().is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_a_too_long_prompt() {
        let mock = Arc::new(MockModel::new("mock"));
        let prompt = "x".repeat(3 * 1024 * 1024);

        let (status, body) = post_chat(router(&mock), &json!({ "prompt": prompt }).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Prompt exceeds maximum length of 100 characters" })
        );
        assert!(mock.recorded_prompts().is_empty());
    }

    #[tokio::test]
    async fn large_prompt_within_limit_passes_default_body_limit() {
        let mock = Arc::new(MockModel::new("mock"));
        mock.queue_text("read it all");
        let prompt = "x".repeat(3 * 1024 * 1024);

        let app = router_with_limit(&mock, 4 * 1024 * 1024);
        let (status, body) = post_chat(app, &json!({ "prompt": prompt }).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "read it all" }));
        assert_eq!(mock.recorded_prompts()[0].len(), prompt.len());
    }

    #[tokio::test]
    async fn chat_blocked() {
        let mock = Arc::new(MockModel::new("mock"));
        mock.queue_block(BlockSignal::new("SAFETY"));

        let (status, body) = post_chat(router(&mock), r#"{"prompt":"Hello"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("safety"));
        assert_eq!(body["details"]["finishReason"], "SAFETY");
        assert!(body.get("response").is_none());
    }

    #[tokio::test]
    async fn version_route() {
        let mock = Arc::new(MockModel::new("mock"));
        let response = router(&mock)
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).starts_with("helper-chat "));
    }
}
