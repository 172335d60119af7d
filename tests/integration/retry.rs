//! Retry behavior of the retrying fetch.

use crate::integration::mock_server::{scripted_server, MockServerFixture};
use reqwest::Method;
use serde_json::Value;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn persistent_server_error_uses_all_attempts() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response("GET", "/ml/game-detection", 503, r#"{"detail":"overloaded"}"#, 3)
        .await;

    let client = fixture.client(false, None, 2);
    let err = client
        .fetch_with_retry::<Value>(Method::GET, "/ml/game-detection", None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    mock.assert_async().await;
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response("POST", "/ml/optimize-game/g1", 422, r#"{"detail":"invalid"}"#, 1)
        .await;

    let client = fixture.client(false, None, 2);
    let err = client
        .fetch_with_retry::<Value>(Method::POST, "/ml/optimize-game/g1", Some(&serde_json::json!({})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    mock.assert_async().await;
}

#[tokio::test]
async fn dev_backend_missing_is_not_retried() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response("GET", "/ml/game-detection", 404, "{}", 1)
        .await;

    let client = fixture.client(true, None, 2);
    let _ = client
        .fetch_with_retry::<Value>(Method::GET, "/ml/game-detection", None)
        .await
        .unwrap_err();
    mock.assert_async().await;
    assert_eq!(fixture.advisories.len(), 1);
}

#[tokio::test]
async fn retry_then_success() {
    let (base_url, hits) = scripted_server(vec![(500, "{}"), (502, "{}"), (200, r#"{"ok":true}"#)]).await;
    let mut fixture = MockServerFixture::new().await;
    fixture.base_url = base_url;

    let client = fixture.client(false, None, 2);
    let v: Value = client
        .fetch_with_retry(Method::GET, "/ml/system-info", None)
        .await
        .unwrap();
    assert_eq!(v["ok"], true);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unreachable_backend_is_retried_then_fails() {
    // Nothing listens on port 9 of localhost in the test environment.
    let mut fixture = MockServerFixture::new().await;
    fixture.base_url = "http://127.0.0.1:9".to_string();
    let client = fixture.client(false, None, 1);
    let err = client
        .fetch_with_retry::<Value>(Method::GET, "/ml/system-info", None)
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
