//! Introspection tests against a mock LoLLMs backend.
//!
//! Covers the success body, inactive tokens, HTTP rejections and transport failures.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lollms_sso_client::{
    Config, IntrospectionFailure, MemoryNavigator, MemoryStorage, SsoClient, SsoError,
};

const TOKEN: &str = "tok-123";

fn setup_client(base_url: &str) -> SsoClient {
    let config = Config::new(base_url, "demo").unwrap();
    SsoClient::new(config, Arc::new(MemoryNavigator::default()), Arc::new(MemoryStorage::new()))
        .unwrap()
}

async fn mount_introspect(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/sso/introspect"))
        .respond_with(response)
        .mount(server)
        .await;
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_active_token_returns_body_unmodified() {
    let server = MockServer::start().await;
    let body = json!({"active": true, "sub": "u1", "scopes": ["read"], "exp": 1_700_000_000});
    mount_introspect(&server, ResponseTemplate::new(200).set_body_json(&body)).await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let result = client.introspect().await.unwrap();
    assert_eq!(result, body);
    assert_eq!(client.get_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_token_sent_as_multipart_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sso/introspect"))
        .and(body_string_contains("name=\"token\""))
        .and(body_string_contains(TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    client.introspect().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "got {content_type}");
}

#[tokio::test]
async fn test_trailing_slash_base_url_hits_same_endpoint() {
    let server = MockServer::start().await;
    mount_introspect(&server, ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .await;

    let client = setup_client(&format!("{}/", server.uri()));
    client.set_token(TOKEN).unwrap();

    assert!(client.introspect().await.is_ok());
}

// =============================================================================
// Not authenticated
// =============================================================================

#[tokio::test]
async fn test_no_token_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .expect(0)
        .mount(&server)
        .await;

    let client = setup_client(&server.uri());
    let err = client.introspect().await.unwrap_err();

    assert!(matches!(err, SsoError::NotAuthenticated));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Inactive tokens
// =============================================================================

#[tokio::test]
async fn test_inactive_token_is_cleared_with_backend_error() {
    let server = MockServer::start().await;
    mount_introspect(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"active": false, "error": "expired"})),
    )
    .await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert_eq!(err.to_string(), "expired");
    assert!(err.is_inactive());
    assert!(client.get_token().is_none());
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_inactive_without_error_uses_default_message() {
    let server = MockServer::start().await;
    mount_introspect(&server, ResponseTemplate::new(200).set_body_json(json!({"active": false})))
        .await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert_eq!(err.to_string(), "Token is no longer active.");
    assert!(client.get_token().is_none());
}

#[tokio::test]
async fn test_missing_active_field_counts_as_inactive() {
    let server = MockServer::start().await;
    mount_introspect(&server, ResponseTemplate::new(200).set_body_json(json!({"sub": "u1"})))
        .await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert!(err.is_inactive());
    assert!(client.get_token().is_none());
}

// =============================================================================
// HTTP and transport failures (token is kept)
// =============================================================================

#[tokio::test]
async fn test_error_status_uses_detail() {
    let server = MockServer::start().await;
    mount_introspect(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid client"})),
    )
    .await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid client");
    assert_eq!(err.status(), Some(401));
    assert_eq!(client.get_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_error_status_with_unparsable_body_mentions_status() {
    let server = MockServer::start().await;
    mount_introspect(&server, ResponseTemplate::new(502).set_body_string("<html>bad gateway"))
        .await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert!(err.to_string().contains("502"), "got: {err}");
    assert!(matches!(
        err,
        SsoError::Introspection { reason: IntrospectionFailure::Status(502), .. }
    ));
    assert_eq!(client.get_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_error_status_json_without_detail_mentions_status() {
    let server = MockServer::start().await;
    mount_introspect(&server, ResponseTemplate::new(500).set_body_json(json!({"message": "x"})))
        .await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert_eq!(err.to_string(), "Server responded with status: 500");
}

#[tokio::test]
async fn test_success_with_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    mount_introspect(&server, ResponseTemplate::new(200).set_body_string("ok")).await;

    let client = setup_client(&server.uri());
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert!(matches!(
        err,
        SsoError::Introspection { reason: IntrospectionFailure::Malformed, .. }
    ));
    assert_eq!(client.get_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_transport_failure_keeps_token() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = setup_client(&uri);
    client.set_token(TOKEN).unwrap();

    let err = client.introspect().await.unwrap_err();
    assert!(matches!(
        err,
        SsoError::Introspection { reason: IntrospectionFailure::Transport, .. }
    ));
    assert!(!err.is_inactive());
    assert_eq!(client.get_token().as_deref(), Some(TOKEN));
    assert!(client.is_authenticated());
}
