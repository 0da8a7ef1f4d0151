//! Property-based tests for relay validation

use super::*;
use crate::llm::testing::MockModel;
use proptest::prelude::*;
use serde_json::json;

const MAX: usize = 40;

fn run<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn relay_for(mock: &Arc<MockModel>) -> RelayService {
    RelayService::new(Arc::new(LazyModel::ready(mock.clone())), MAX)
}

fn send(mock: &Arc<MockModel>, prompt: &str) -> (StatusCode, PromptResponse) {
    let body = json!({ "prompt": prompt }).to_string();
    run(relay_for(mock).handle(body.as_bytes()))
}

fn non_blank(pattern: &'static str) -> impl Strategy<Value = String> {
    pattern.prop_filter("needs a visible character", |p| !p.trim().is_empty())
}

proptest! {
    #[test]
    fn whitespace_prompts_never_reach_the_model(prompt in "[ \t\r\n\u{a0}\u{2003}]{0,30}") {
        let mock = Arc::new(MockModel::new("mock"));
        let (status, response) = send(&mock, &prompt);

        prop_assert_eq!(status, StatusCode::BAD_REQUEST);
        prop_assert_eq!(response, PromptResponse::failure("No prompt provided"));
        prop_assert!(mock.recorded_prompts().is_empty());
    }

    #[test]
    fn prompts_within_the_limit_are_forwarded_verbatim(prompt in non_blank("\\PC{1,40}")) {
        let mock = Arc::new(MockModel::new("mock"));
        mock.queue_text("ok");
        let (status, response) = send(&mock, &prompt);

        prop_assert_eq!(status, StatusCode::OK);
        prop_assert_eq!(response, PromptResponse::success("ok"));
        prop_assert_eq!(mock.recorded_prompts(), vec![prompt]);
    }

    #[test]
    fn prompts_over_the_limit_never_reach_the_model(prompt in non_blank("\\PC{41,120}")) {
        let mock = Arc::new(MockModel::new("mock"));
        let (status, response) = send(&mock, &prompt);

        prop_assert_eq!(status, StatusCode::BAD_REQUEST);
        prop_assert_eq!(
            response,
            PromptResponse::failure(format!("Prompt exceeds maximum length of {MAX} characters"))
        );
        prop_assert!(mock.recorded_prompts().is_empty());
    }
}
