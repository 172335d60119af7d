//! Connectivity and redirect diagnostics for the ML backend.
//!
//! These checks back the "ML diagnostics" panel: which model health
//! endpoints answer, whether redirect protection is active, and whether a
//! given URL is being bounced to the marketing site.

use crate::client::MlClient;
use crate::service::types::{GAME_DETECTION, GAME_OPTIMIZATION, PERFORMANCE_PREDICTOR, ROUTE_OPTIMIZER};
use futures::future::join_all;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, LOCATION, PRAGMA};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

/// Per-model health endpoints checked by [`Diagnostics::test_connectivity`],
/// keyed by the name used in the report.
pub const MODEL_HEALTH_CHECKS: [(&str, &str); 4] = [
    ("routeOptimizer", ROUTE_OPTIMIZER),
    ("performancePredictor", PERFORMANCE_PREDICTOR),
    ("gameDetection", GAME_DETECTION),
    ("gameOptimization", GAME_OPTIMIZATION),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCheck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub success: bool,
    pub results: BTreeMap<String, EndpointCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectProtectionResult {
    pub protected: bool,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlTestResult {
    pub original_url: String,
    pub final_url: String,
    pub was_redirected: bool,
    #[serde(rename = "isGamePathAI")]
    pub is_game_path_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct Diagnostics {
    client: MlClient,
}

impl Diagnostics {
    pub fn new(client: MlClient) -> Self {
        Self { client }
    }

    /// Probe every model health endpoint concurrently.
    pub async fn test_connectivity(&self) -> ConnectivityReport {
        info!("running ML connectivity diagnostics");
        let checks = MODEL_HEALTH_CHECKS.iter().map(|(name, model)| async move {
            let path = self.client.config().ml_path(&format!("health/{}", model));
            let outcome = self
                .client
                .fetch::<serde_json::Value>(Method::GET, &path, None)
                .await;
            let check = match outcome {
                Ok(_) => EndpointCheck {
                    success: true,
                    error: None,
                },
                Err(e) => EndpointCheck {
                    success: false,
                    error: Some(e.to_string()),
                },
            };
            (name.to_string(), check)
        });
        let results: BTreeMap<String, EndpointCheck> = join_all(checks).await.into_iter().collect();
        let success = results.values().all(|c| c.success);
        info!(success, failed = results.values().filter(|c| !c.success).count(), "ML diagnostics finished");
        ConnectivityReport { success, results }
    }

    /// Request an endpoint that the backend answers with a redirect.
    ///
    /// Protection works when the call fails because of that redirect.
    pub async fn test_redirect_protection(&self) -> RedirectProtectionResult {
        let path = self.client.config().ml_path("test-redirect");
        match self
            .client
            .fetch::<serde_json::Value>(Method::GET, &path, None)
            .await
        {
            Ok(_) => RedirectProtectionResult {
                protected: false,
                details: "Redirect protection may not be working correctly".to_string(),
            },
            Err(e) if e.is_redirect() => RedirectProtectionResult {
                protected: true,
                details: "Redirect protection is working correctly".to_string(),
            },
            Err(e) => RedirectProtectionResult {
                protected: false,
                details: format!("Unexpected error: {}", e),
            },
        }
    }

    /// HEAD `url` without following redirects and report where it points.
    pub async fn test_url(&self, url: &str) -> UrlTestResult {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let separator = if url.contains('?') { '&' } else { '?' };
        let test_url = format!("{}{}cacheBust={}", url, separator, millis);

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(crate::headers::X_NO_REDIRECT, HeaderValue::from_static("1"));

        let resp = match self
            .client
            .transport()
            .manual_redirect_client()
            .head(&test_url)
            .headers(headers)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                error!(url, error = %e, "URL redirect test failed");
                return UrlTestResult {
                    original_url: url.to_string(),
                    final_url: "Error".to_string(),
                    was_redirected: true,
                    is_game_path_ai: false,
                    response_status: None,
                    content_type: None,
                    error: Some(e.to_string()),
                };
            }
        };

        let status = resp.status();
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|loc| resp.url().join(loc).ok())
            .map(|u| u.to_string());
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let was_redirected = status.is_redirection() && location.is_some();
        let final_url = location.unwrap_or_else(|| resp.url().to_string());
        let is_game_path_ai = self.is_marketing_host(&final_url);

        let result = UrlTestResult {
            original_url: url.to_string(),
            final_url,
            was_redirected,
            is_game_path_ai,
            response_status: Some(status.as_u16()),
            content_type,
            error: None,
        };
        if was_redirected && is_game_path_ai {
            error!(url, final_url = result.final_url.as_str(), "URL was redirected to the GamePath AI website");
        } else {
            info!(url, was_redirected, status = status.as_u16(), "URL test finished");
        }
        result
    }

    fn is_marketing_host(&self, url: &str) -> bool {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        self.client.config().is_blocked_redirect_host(&host)
    }
}
