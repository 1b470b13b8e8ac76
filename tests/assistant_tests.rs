// Integration tests for the Gemini client against a mock endpoint

use communisync::assistant::{
    Assistant, AssistantError, GeminiClient, GeminiConfig, GenerateContentRequest,
    GenerateContentResponse,
};
use communisync::media::VirtualMediaBackend;
use communisync::session::FALLBACK_REPLY;
use communisync::{InterviewSession, SessionConfig, TurnOutcome};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/models/gemini-test:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        model: "gemini-test".to_string(),
    })
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn test_reply_sends_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({
            "contents": [ { "role": "user", "parts": [ { "text": "Tell me about Rust" } ] } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Rust is great")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).reply("Tell me about Rust").await.unwrap();

    assert_eq!(reply, "Rust is great");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = client_for(&server).reply("hello").await.unwrap_err();

    assert_eq!(
        err,
        AssistantError::Status {
            status: 429,
            body: "quota exceeded".to_string()
        }
    );
}

#[tokio::test]
async fn test_unexpected_shapes_are_malformed() {
    for body in [
        json!({ "candidates": [] }),
        json!({ "candidates": [ { "content": { "parts": [] } } ] }),
        json!({ "candidates": "nope" }),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let err = client_for(&server).reply("hello").await.unwrap_err();
        assert!(
            matches!(err, AssistantError::Malformed(_)),
            "body {} gave {:?}",
            body,
            err
        );
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let client = GeminiClient::new(GeminiConfig {
        api_key: "test-key".to_string(),
        base_url: "http://127.0.0.1:1".to_string(),
        model: "gemini-test".to_string(),
    });

    let err = client.reply("hello").await.unwrap_err();

    assert!(matches!(err, AssistantError::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_generate_passes_full_response_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("hi there")))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .generate(&GenerateContentRequest::user_text("hi"))
        .await
        .unwrap();

    assert_eq!(response, GenerateContentResponse::from_text("hi there"));
    assert_eq!(response.first_text(), Some("hi there"));
}

#[tokio::test]
async fn test_session_falls_back_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = InterviewSession::new(
        Arc::new(VirtualMediaBackend::new()),
        Arc::new(client_for(&server)),
    );
    session
        .start(SessionConfig::new("Data Engineer", "Pipelines"))
        .await
        .unwrap();

    let turn = session.send_message("hello").await.unwrap().unwrap();

    assert_eq!(turn.settled().await, Some(TurnOutcome::Fallback));
    assert_eq!(
        session.messages().await.last().unwrap().content,
        FALLBACK_REPLY
    );
}

#[tokio::test]
async fn test_session_appends_remote_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Nice to meet you")))
        .mount(&server)
        .await;

    let session = InterviewSession::new(
        Arc::new(VirtualMediaBackend::new()),
        Arc::new(client_for(&server)),
    );
    session
        .start(SessionConfig::new("Data Engineer", "Pipelines"))
        .await
        .unwrap();

    let turn = session.send_message("hello").await.unwrap().unwrap();

    assert_eq!(turn.settled().await, Some(TurnOutcome::Replied));
    assert_eq!(
        session.messages().await.last().unwrap().content,
        "Nice to meet you"
    );
}
