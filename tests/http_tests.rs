// HTTP API tests driven through the router without a socket

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use communisync::assistant::{GeminiClient, GeminiConfig};
use communisync::media::{DeviceBehavior, VirtualMediaBackend};
use communisync::{create_router, AppState, UnconfiguredAssistant};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_state(behavior: DeviceBehavior) -> AppState {
    AppState::new(
        Arc::new(VirtualMediaBackend::with_behavior(behavior)),
        Arc::new(UnconfiguredAssistant),
    )
}

fn test_app() -> Router {
    create_router(test_state(DeviceBehavior::Grant))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn setup() -> Value {
    json!({ "role": "Software Engineer", "difficulty": "Advanced", "topic": "System Design" })
}

#[tokio::test]
async fn test_health_check() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_landing_content() {
    let (status, body) = send(&test_app(), "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentKeyword"], "Interviews");
    assert_eq!(body["keywords"].as_array().unwrap().len(), 3);
    assert_eq!(body["cards"].as_array().unwrap().len(), 4);
    assert_eq!(body["callToAction"]["href"], "/login");
}

#[tokio::test]
async fn test_login_stub() {
    let app = test_app();

    let (status, form) = send(&app, "GET", "/login", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["fields"][0]["name"], "email");

    let (status, body) = send(
        &app,
        "POST",
        "/login",
        Some(json!({ "email": "me@example.com", "password": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/interview");

    let (status, _) = send(&app, "POST", "/login", Some(json!({ "email": " " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_invalid_setup_is_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/interview/start",
        Some(json!({ "role": "", "topic": "System Design" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("role"));

    let (_, snapshot) = send(&app, "GET", "/interview", None).await;
    assert_eq!(snapshot["phase"], "setup");
}

#[tokio::test]
async fn test_device_failure_is_service_unavailable() {
    let app = create_router(test_state(DeviceBehavior::NoDevice));

    let (status, body) = send(&app, "POST", "/interview/start", Some(setup())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("camera"));
}

#[tokio::test]
async fn test_interview_flow_hands_stats_to_feedback() {
    let app = test_app();

    let (status, snapshot) = send(&app, "POST", "/interview/start", Some(setup())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snapshot["phase"], "active");
    assert_eq!(snapshot["messages"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["config"]["difficulty"], "Advanced");

    let (status, _) = send(&app, "POST", "/interview/start", Some(setup())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        "/interview/messages",
        Some(json!({ "text": "I have 5 years experience" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["turn"], 1);
    assert_eq!(body["session"]["messages"][1]["role"], "user");

    let (status, media) = send(&app, "POST", "/interview/media/video", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(media, json!({ "videoEnabled": false, "audioEnabled": true }));

    let (status, ended) = send(&app, "POST", "/interview/end", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["redirect"], "/feedback");
    assert_eq!(ended["stats"]["questionsAnswered"], 1);
    let performance = ended["stats"]["performance"].as_u64().unwrap();
    assert!((70..100).contains(&performance));

    let (status, _) = send(&app, "POST", "/interview/end", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, report) = send(&app, "GET", "/feedback", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["isDefault"], false);
    assert_eq!(
        report["skills"]["data"],
        json!([performance, performance, performance])
    );
}

#[tokio::test]
async fn test_feedback_defaults_and_supplied_stats() {
    let app = test_app();

    let (_, report) = send(&app, "GET", "/feedback", None).await;
    assert_eq!(report["isDefault"], true);
    assert_eq!(report["distribution"]["data"], json!([5, 3, 2]));
    assert_eq!(report["skills"]["data"], json!([75, 65, 80]));

    let stats = json!({
        "duration": 42,
        "questionsAnswered": 2,
        "performance": 90,
        "feedback": { "strengths": ["Calm"], "improvements": ["Pace"] }
    });
    let (status, report) = send(&app, "POST", "/feedback", Some(stats)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["distribution"]["data"], json!([2, 0, 0]));
    assert_eq!(report["strengths"], json!(["Calm"]));
}

#[tokio::test]
async fn test_oversized_stats_are_rendered() {
    let stats = json!({
        "duration": 1,
        "questionsAnswered": 50_000_000u64,
        "performance": 100,
        "feedback": { "strengths": [], "improvements": [] }
    });

    let (status, report) = send(&test_app(), "POST", "/feedback", Some(stats)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["distribution"]["data"], json!([50_000_000u64, 0, 0]));
}

#[tokio::test]
async fn test_toggling_missing_track_is_a_conflict() {
    let app = create_router(test_state(DeviceBehavior::AudioOnly));
    send(&app, "POST", "/interview/start", Some(setup())).await;

    let (status, body) = send(&app, "POST", "/interview/media/video", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("video"));
}

#[tokio::test(start_paused = true)]
async fn test_recording_flow() {
    let app = test_app();

    let (status, _) = send(&app, "POST", "/interview/recording/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "GET", "/interview/recording", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "POST", "/interview/start", Some(setup())).await;
    let (status, snapshot) = send(&app, "POST", "/interview/recording/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["recording"], true);

    tokio::time::sleep(std::time::Duration::from_millis(1050)).await;

    let (status, stopped) = send(&app, "POST", "/interview/recording/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stopped["chunks"][0]["frameCount"], 10);

    let (status, saved) = send(&app, "POST", "/interview/recording/save", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let size = saved["sizeBytes"].as_u64().unwrap();
    assert!(size > 0);
    assert!(saved.get("data").is_none());

    let response = app
        .clone()
        .oneshot(
            Request::get("/interview/recording")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        saved["mimeType"].as_str().unwrap()
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.len() as u64, size);
}

#[tokio::test]
async fn test_messages_require_active_session() {
    let (status, _) = send(
        &test_app(),
        "POST",
        "/interview/messages",
        Some(json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_proxy_without_credential() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/assistant",
        Some(json!({ "contents": [ { "role": "user", "parts": [ { "text": "hi" } ] } ] })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_proxy_forwards_to_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [ { "content": { "parts": [ { "text": "proxied" } ] } } ]
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(GeminiConfig {
        api_key: "server-key".to_string(),
        base_url: server.uri(),
        model: "gemini-test".to_string(),
    });
    let app = create_router(test_state(DeviceBehavior::Grant).with_proxy(Arc::new(client)));

    let request = json!({ "contents": [ { "role": "user", "parts": [ { "text": "hi" } ] } ] });
    let (status, body) = send(&app, "POST", "/api/assistant", Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidates"][0]["content"]["parts"][0]["text"], "proxied");

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let (status, _) = send(&app, "POST", "/api/assistant", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
