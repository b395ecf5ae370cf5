//! Query round-trip tests
//!
//! Drive `QueryController` and `ReqwestCompletionClient` against a local
//! mock chat-completions endpoint.

use naval::query::{
    ChatRequest, CompletionClient, DisplayContent, QueryController, QueryError,
    ReqwestCompletionClient, ERROR_MESSAGE, PERSONA_PREFIX, SYSTEM_PROMPT,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS: &str = "/v1/chat/completions";

fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), COMPLETIONS)
}

fn completion(content: &str) -> serde_json::Value {
    json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
}

fn controller_for(server: &MockServer, input: &str) -> QueryController {
    let mut controller = QueryController::with_endpoint(endpoint(server));
    controller.update_input(input);
    controller
}

#[tokio::test]
async fn test_answer_is_rendered_and_busy_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("**Wealth** is assets that work for you.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server, "What is wealth?");
    assert!(controller.submit());
    assert!(controller.is_busy());
    assert!(controller.wait().await);

    assert!(!controller.is_busy());
    let display = controller.display().expect("display set");
    assert!(!display.is_failure());
    assert!(display
        .as_markup()
        .contains("<strong>Wealth</strong> is assets that work for you."));
}

#[tokio::test]
async fn test_request_carries_prompt_and_json_headers() {
    let server = MockServer::start().await;
    let expected = json!({
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": format!("{PERSONA_PREFIX}What is wealth?") },
        ]
    });
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_json(expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server, "What is wealth?");
    assert!(controller.submit_and_wait().await);
    assert_eq!(
        controller.display(),
        Some(&DisplayContent::Rendered {
            markdown: "ok".to_string(),
            html: "<p>ok</p>\n".to_string(),
        })
    );
}

#[tokio::test]
async fn test_whitespace_input_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server, "   ");
    assert!(!controller.submit());
    assert!(!controller.is_busy());
    assert!(controller.display().is_none());
    assert_eq!(controller.input(), "   ");
    assert!(!controller.wait().await);
}

#[tokio::test]
async fn test_server_error_shows_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server, "What is wealth?");
    assert!(controller.submit_and_wait().await);

    assert!(!controller.is_busy());
    assert_eq!(
        controller.display(),
        Some(&DisplayContent::Failed {
            message: ERROR_MESSAGE.to_string()
        })
    );
}

#[tokio::test]
async fn test_missing_choices_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server, "What is wealth?");
    assert!(controller.submit_and_wait().await);

    assert!(!controller.is_busy());
    assert_eq!(
        controller.display().map(DisplayContent::as_markup),
        Some(ERROR_MESSAGE)
    );
}

#[tokio::test]
async fn test_second_submit_while_pending_sends_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("Play long-term games."))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server, "How do I win?");
    assert!(controller.submit());
    assert!(!controller.submit());
    assert!(controller.wait().await);

    assert!(!controller.is_busy());
    assert!(controller
        .display()
        .is_some_and(|d| d.as_markup().contains("Play long-term games.")));
    // Dropping the server verifies `.expect(1)`.
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_failure() {
    // Nothing listens on port 9 (discard) on a test machine.
    let mut controller = QueryController::with_endpoint("http://127.0.0.1:9/v1/chat/completions");
    controller.update_input("Anyone there?");
    assert!(controller.submit_and_wait().await);

    assert!(!controller.is_busy());
    assert!(controller.display().is_some_and(DisplayContent::is_failure));
}

#[tokio::test]
async fn test_client_reports_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = ReqwestCompletionClient::new(endpoint(&server));
    let err = client
        .complete(&ChatRequest::for_question("hi"))
        .await
        .expect_err("status error");
    match err {
        QueryError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_reports_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ReqwestCompletionClient::new(endpoint(&server));
    let err = client
        .complete(&ChatRequest::for_question("hi"))
        .await
        .expect_err("decode error");
    assert!(matches!(err, QueryError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn test_client_reports_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = ReqwestCompletionClient::new(endpoint(&server));
    let err = client
        .complete(&ChatRequest::for_question("hi"))
        .await
        .expect_err("empty choices");
    assert!(matches!(err, QueryError::EmptyChoices), "{err:?}");
}

#[tokio::test]
async fn test_client_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "content": "first" } },
                { "message": { "content": "second" } },
            ]
        })))
        .mount(&server)
        .await;

    let client = ReqwestCompletionClient::new(endpoint(&server));
    let content = client
        .complete(&ChatRequest::for_question("hi"))
        .await
        .expect("completion");
    assert_eq!(content, "first");
    assert_eq!(client.endpoint(), endpoint(&server));
}
