//! Connectivity report and redirect checks.

use crate::integration::mock_server::MockServerFixture;
use gamepath_ml_client::diagnostics::UrlTestResult;
use mockito::Matcher;

#[tokio::test]
async fn connectivity_report_marks_failing_models() {
    let fixture = MockServerFixture::new().await;
    let _a = fixture
        .mock_json_response("GET", "/ml/health/route-optimizer", 200, r#"{"status":"ok"}"#)
        .await;
    let _b = fixture
        .mock_json_response("GET", "/ml/health/performance-predictor", 200, r#"{"status":"ok"}"#)
        .await;
    let _c = fixture
        .mock_json_response("GET", "/ml/health/game-detection", 200, r#"{"status":"ok"}"#)
        .await;
    let _d = fixture
        .mock_error_response("GET", "/ml/health/game-optimization", 503, r#"{"detail":"model loading"}"#, 1)
        .await;

    let report = fixture.create_test_client().diagnostics().test_connectivity().await;
    assert!(!report.success);
    assert_eq!(report.results.len(), 4);
    assert!(report.results["routeOptimizer"].success);
    assert!(report.results["gameDetection"].success);
    let failed = &report.results["gameOptimization"];
    assert!(!failed.success);
    assert!(failed.error.as_deref().unwrap_or("").contains("model loading"));
}

#[tokio::test]
async fn redirect_protection_detected_in_production() {
    let fixture = MockServerFixture::new().await;
    let _redirect = fixture
        .mock_redirect("GET", "/ml/test-redirect", "https://gamepathai.com/")
        .await;

    let result = fixture
        .create_test_client()
        .diagnostics()
        .test_redirect_protection()
        .await;
    assert!(result.protected, "{}", result.details);
}

#[tokio::test]
async fn url_test_reports_marketing_redirect() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("HEAD", "/ml/page")
            .match_query(Matcher::Regex(r"^cacheBust=\d+$".to_string()))
            .with_status(301)
            .with_header("location", "https://www.gamepathai.com/pricing")
            .create_async()
            .await
    };

    let url = format!("{}/ml/page", fixture.base_url);
    let result = fixture.create_test_client().diagnostics().test_url(&url).await;
    assert!(result.was_redirected);
    assert!(result.is_game_path_ai);
    assert_eq!(result.final_url, "https://www.gamepathai.com/pricing");
    assert_eq!(result.response_status, Some(301));
    mock.assert_async().await;
}

#[tokio::test]
async fn url_test_without_redirect() {
    let fixture = MockServerFixture::new().await;
    let _mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("HEAD", "/ml/health")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("a".to_string(), "1".to_string()),
                Matcher::Regex(r"cacheBust=\d+".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .create_async()
            .await
    };

    let url = format!("{}/ml/health?a=1", fixture.base_url);
    let result = fixture.create_test_client().diagnostics().test_url(&url).await;
    assert!(!result.was_redirected);
    assert!(!result.is_game_path_ai);
    assert_eq!(result.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn url_test_network_failure_reports_error() {
    let fixture = MockServerFixture::new().await;
    let result = fixture
        .create_test_client()
        .diagnostics()
        .test_url("http://127.0.0.1:9/ml/health")
        .await;
    assert_eq!(result.final_url, "Error");
    assert!(result.error.is_some());
}

#[tokio::test]
async fn url_test_ignores_look_alike_hosts() {
    let fixture = MockServerFixture::new().await;
    let _mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("HEAD", "/ml/page")
            .match_query(Matcher::Any)
            .with_status(302)
            .with_header("location", "https://notgamepathai.com/x")
            .create_async()
            .await
    };

    let url = format!("{}/ml/page", fixture.base_url);
    let result = fixture.create_test_client().diagnostics().test_url(&url).await;
    assert!(result.was_redirected);
    assert!(!result.is_game_path_ai);
}

#[test]
fn url_test_result_uses_frontend_field_names() {
    let result = UrlTestResult {
        original_url: "http://127.0.0.1:8000/ml/health".to_string(),
        final_url: "https://gamepathai.com/".to_string(),
        was_redirected: true,
        is_game_path_ai: true,
        response_status: Some(301),
        content_type: None,
        error: None,
    };
    let v = serde_json::to_value(&result).unwrap();
    assert_eq!(v["isGamePathAI"], true);
    assert!(v.get("isGamePathAi").is_none());
    assert_eq!(v["originalUrl"], "http://127.0.0.1:8000/ml/health");
    assert_eq!(v["wasRedirected"], true);
    assert_eq!(v["responseStatus"], 301);

    let back: UrlTestResult = serde_json::from_value(v).unwrap();
    assert_eq!(back, result);
}
