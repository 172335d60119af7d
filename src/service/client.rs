use crate::client::MlClient;
use crate::Result;
use reqwest::Method;
use tracing::{info, warn};

use super::types::{
    DetectedGamesResponse, OptimizeGameOptions, OptimizeGameResponse,
    PerformancePredictorResponse, RouteOptimizerParams, RouteOptimizerResponse,
    SystemInfoResponse, GAME_DETECTION, OPTIMIZE_GAME, PERFORMANCE_PREDICTOR, ROUTE_OPTIMIZER,
    SYSTEM_INFO,
};

/// Typed operations for the backend's models. Model calls go through the
/// retrying fetch.
#[derive(Clone)]
pub struct MlService {
    client: MlClient,
}

impl MlService {
    pub fn new(client: MlClient) -> Self {
        Self { client }
    }

    fn path(&self, endpoint: &str) -> String {
        self.client.config().ml_path(endpoint)
    }

    /// Analyze and optimize network routes for a game.
    pub async fn optimize_routes(
        &self,
        game_id: &str,
        params: &RouteOptimizerParams,
    ) -> Result<RouteOptimizerResponse> {
        info!(game_id, region = params.region.as_deref().unwrap_or(""), "optimizing routes");
        let body = serde_json::to_value(params)?;
        self.client
            .fetch_with_retry(
                Method::POST,
                &self.path(&format!("{}/{}", ROUTE_OPTIMIZER, game_id)),
                Some(&body),
            )
            .await
    }

    /// Predict optimal settings for a game on the given hardware.
    pub async fn predict_performance(
        &self,
        game_id: &str,
        system_specs: &serde_json::Value,
    ) -> Result<PerformancePredictorResponse> {
        let body = serde_json::json!({ "systemSpecs": system_specs });
        self.client
            .fetch_with_retry(
                Method::POST,
                &self.path(&format!("{}/{}", PERFORMANCE_PREDICTOR, game_id)),
                Some(&body),
            )
            .await
    }

    /// Installed games. Never fails: backend errors yield an empty list.
    pub async fn detect_games(&self) -> DetectedGamesResponse {
        match self
            .client
            .fetch_with_retry(Method::GET, &self.path(GAME_DETECTION), None)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "game detection failed; returning empty list");
                DetectedGamesResponse::default()
            }
        }
    }

    /// Run route, settings and system optimization for a game.
    pub async fn optimize_game(
        &self,
        game_id: &str,
        options: &OptimizeGameOptions,
    ) -> Result<OptimizeGameResponse> {
        let resolved = options.resolved();
        info!(game_id, options = ?resolved, "starting game optimization");
        let body = serde_json::to_value(&resolved)?;
        self.client
            .fetch_with_retry(
                Method::POST,
                &self.path(&format!("{}/{}", OPTIMIZE_GAME, game_id)),
                Some(&body),
            )
            .await
    }

    /// Hardware and network snapshot. Single attempt; callers poll it.
    pub async fn system_info(&self) -> Result<SystemInfoResponse> {
        self.client.get(&self.path(SYSTEM_INFO)).await
    }
}
