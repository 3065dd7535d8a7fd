use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::TestConfig;
use verification_cell::router::verification_routes;
use verification_cell::services::verifier::SessionStore;

async fn create_test_app(mail_server: &MockServer) -> Router {
    let config = TestConfig::with_mock_endpoints("http://localhost:54321", &mail_server.uri());
    verification_routes(config.to_arc(), SessionStore::new())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
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
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Pull the dispatched code back out of the captured mail request.
async fn dispatched_code(mail_server: &MockServer) -> String {
    let requests = mail_server.received_requests().await.unwrap();
    let last = requests.last().expect("no mail dispatched");
    let body: Value = serde_json::from_slice(&last.body).unwrap();

    body["template_params"]["passcode"]
        .as_str()
        .expect("passcode missing from template params")
        .to_string()
}

#[tokio::test]
async fn test_request_confirm_roundtrip() {
    let mail_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mail_server)
        .await;

    let app = create_test_app(&mail_server).await;

    let (status, body) = post_json(&app, "/request", json!({ "email": "Jane@X.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let code = dispatched_code(&mail_server).await;
    assert_eq!(code.len(), 6);

    let (status, body) = post_json(
        &app,
        "/confirm",
        json!({ "session_id": session_id, "code": code }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email verified successfully.");

    // The code was discarded on success: replaying it finds no pending code.
    let (status, _) = post_json(
        &app,
        "/confirm",
        json!({ "session_id": session_id, "code": code }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_code_is_rejected() {
    let mail_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mail_server)
        .await;

    let app = create_test_app(&mail_server).await;

    let (_, body) = post_json(&app, "/request", json!({ "email": "jane@x.com" })).await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        "/confirm",
        json!({ "session_id": session_id, "code": "000000" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Verification code does not match");
}

#[tokio::test]
async fn test_reset_invalidates_pending_code() {
    let mail_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mail_server)
        .await;

    let app = create_test_app(&mail_server).await;

    let (_, body) = post_json(&app, "/request", json!({ "email": "jane@x.com" })).await;
    let session_id = body["session_id"].as_str().unwrap().to_string();
    let code = dispatched_code(&mail_server).await;

    let (status, _) = post_json(
        &app,
        "/reset",
        json!({ "session_id": session_id, "email": "other@x.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &app,
        "/confirm",
        json!({ "session_id": session_id, "code": code }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No verification code is pending for this session");
}

#[tokio::test]
async fn test_dispatch_failure_surfaces_as_bad_gateway() {
    let mail_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mail_server)
        .await;

    let app = create_test_app(&mail_server).await;

    let (status, _) = post_json(&app, "/request", json!({ "email": "jane@x.com" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_blank_email_is_rejected() {
    let mail_server = MockServer::start().await;
    let app = create_test_app(&mail_server).await;

    let (status, body) = post_json(&app, "/request", json!({ "email": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is required");
}
