//! Typed model operations against a mock backend.

use crate::integration::mock_server::MockServerFixture;
use gamepath_ml_client::service::{
    Aggressiveness, OptimizationType, OptimizeGameOptions, RouteOptimizerParams,
};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn optimize_routes_posts_params() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/ml/route-optimizer/valorant")
            .match_body(Matcher::Json(json!({"region": "eu-west", "aggressiveness": "high"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"optimizedRoutes":3,"latencyReduction":12.5,"settings":{"mtu":1400}}"#)
            .create_async()
            .await
    };

    let service = fixture.create_test_client().service();
    let params = RouteOptimizerParams {
        region: Some("eu-west".to_string()),
        aggressiveness: Some(Aggressiveness::High),
    };
    let r = service.optimize_routes("valorant", &params).await.unwrap();
    assert!(r.success);
    assert_eq!(r.optimized_routes, 3);
    assert_eq!(r.settings.get("mtu"), Some(&json!(1400)));
    mock.assert_async().await;
}

#[tokio::test]
async fn predict_performance_wraps_system_specs() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/ml/performance-predictor/cs2")
            .match_body(Matcher::Json(json!({"systemSpecs": {"gpu": "rtx"}})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"recommendedSettings":{"preset":"high"},"expectedFps":144.0,"confidence":0.9}"#)
            .create_async()
            .await
    };

    let service = fixture.create_test_client().service();
    let r = service
        .predict_performance("cs2", &json!({"gpu": "rtx"}))
        .await
        .unwrap();
    assert_eq!(r.expected_fps, 144.0);
    assert_eq!(r.recommended_settings.get("preset"), Some(&json!("high")));
    mock.assert_async().await;
}

#[tokio::test]
async fn detect_games_parses_list() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            "GET",
            "/ml/game-detection",
            200,
            r#"{"detectedGames":[{"id":"1","name":"Dota 2","path":"C:/Games/dota","version":"7.35"}]}"#,
        )
        .await;

    let games = fixture.create_test_client().service().detect_games().await;
    assert_eq!(games.detected_games.len(), 1);
    assert_eq!(games.detected_games[0].name, "Dota 2");
    assert_eq!(games.detected_games[0].version.as_deref(), Some("7.35"));
}

#[tokio::test]
async fn detect_games_falls_back_to_empty_list() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response("GET", "/ml/game-detection", 500, "{}", 2)
        .await;

    let games = fixture.client(false, None, 1).service().detect_games().await;
    assert!(games.detected_games.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn optimize_game_sends_resolved_defaults() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/ml/optimize-game/apex")
            .match_body(Matcher::Json(json!({
                "optimizeRoutes": true,
                "optimizeSettings": true,
                "optimizeSystem": true,
                "aggressiveness": "medium"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"optimizationType":"network","improvements":{"latency":8.0}}"#)
            .create_async()
            .await
    };

    let r = fixture
        .create_test_client()
        .service()
        .optimize_game("apex", &OptimizeGameOptions::default())
        .await
        .unwrap();
    assert_eq!(r.optimization_type, OptimizationType::Network);
    assert_eq!(r.improvements.latency, Some(8.0));
    mock.assert_async().await;
}

#[tokio::test]
async fn system_info_decodes_nested_sections() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            "GET",
            "/ml/system-info",
            200,
            r#"{"systemInfo":{
                "cpu":{"model":"Ryzen 7","cores":8,"threads":16,"speed":3.8},
                "ram":{"total":32,"free":20,"usage":37.5},
                "gpu":{"model":"RTX 4070","vram":12,"driver":"551.23"},
                "network":{"bandwidth":500,"latency":18,"jitter":2}
            }}"#,
        )
        .await;

    let info = fixture
        .create_test_client()
        .service()
        .system_info()
        .await
        .unwrap()
        .system_info;
    assert_eq!(info.cpu.cores, 8);
    assert_eq!(info.gpu.driver, "551.23");
    assert_eq!(info.network.latency, 18.0);
}
