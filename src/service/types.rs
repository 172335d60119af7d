use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Endpoint names under the ML prefix.
pub const ROUTE_OPTIMIZER: &str = "route-optimizer";
pub const PERFORMANCE_PREDICTOR: &str = "performance-predictor";
pub const GAME_DETECTION: &str = "game-detection";
pub const GAME_OPTIMIZATION: &str = "game-optimization";
pub const OPTIMIZE_GAME: &str = "optimize-game";
pub const SYSTEM_INFO: &str = "system-info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Aggressiveness {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptimizerParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggressiveness: Option<Aggressiveness>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptimizerResponse {
    pub success: bool,
    pub optimized_routes: u32,
    pub latency_reduction: f64,
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePredictorResponse {
    #[serde(default)]
    pub recommended_settings: HashMap<String, serde_json::Value>,
    pub expected_fps: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedGame {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedGamesResponse {
    #[serde(default)]
    pub detected_games: Vec<DetectedGame>,
}

/// Options for a full game optimization. Unset fields take the defaults of
/// [`OptimizeGameOptions::resolved`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeGameOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_routes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_settings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_system: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggressiveness: Option<Aggressiveness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_info: Option<serde_json::Value>,
}

impl OptimizeGameOptions {
    /// Every optimization enabled and `medium` aggressiveness unless overridden.
    pub fn resolved(&self) -> Self {
        Self {
            optimize_routes: Some(self.optimize_routes.unwrap_or(true)),
            optimize_settings: Some(self.optimize_settings.unwrap_or(true)),
            optimize_system: Some(self.optimize_system.unwrap_or(true)),
            aggressiveness: Some(self.aggressiveness.unwrap_or_default()),
            system_info: self.system_info.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationType {
    Network,
    System,
    Both,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Improvements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeGameResponse {
    pub success: bool,
    pub optimization_type: OptimizationType,
    #[serde(default)]
    pub improvements: Improvements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub model: String,
    pub cores: u32,
    pub threads: u32,
    pub speed: f64,
}

/// Memory figures; `total`/`free` in GB, `usage` in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RamInfo {
    pub total: f64,
    pub free: f64,
    pub usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub model: String,
    pub vram: f64,
    pub driver: String,
}

/// Bandwidth in Mbps, latency and jitter in ms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub bandwidth: f64,
    pub latency: f64,
    pub jitter: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub cpu: CpuInfo,
    pub ram: RamInfo,
    pub gpu: GpuInfo,
    pub network: NetworkInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfoResponse {
    pub system_info: SystemInfo,
}
