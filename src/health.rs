//! Backend liveness probe.
//!
//! A probe is one `GET {base}{prefix}/health` raced against a timeout. Every
//! failure path (network error, non-2xx status, timeout) collapses to
//! `false`; the probe never returns an error. When the timeout wins, the
//! request future is dropped, which aborts the in-flight request.

use crate::config::MlConfig;
use crate::headers::{NO_CACHE, X_NO_REDIRECT};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Outcome of a single probe with the facts behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub healthy: bool,
    /// Status code, if any response arrived in time.
    pub status: Option<u16>,
    pub latency: Duration,
    pub timed_out: bool,
}

#[derive(Clone)]
pub struct HealthProber {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HealthProber {
    pub fn new(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    /// Probe `config.health_url()` with `config.health_timeout()`.
    pub fn from_config(client: reqwest::Client, config: &MlConfig) -> Self {
        Self::new(client, config.health_url(), config.health_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `true` only for a 2xx response that arrived before the timeout.
    pub async fn is_backend_running(&self) -> bool {
        self.probe().await.healthy
    }

    pub async fn probe(&self) -> HealthReport {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
        headers.insert(X_NO_REDIRECT, HeaderValue::from_static("1"));

        let start = Instant::now();
        let request = self.client.get(&self.url).headers(headers).send();
        let report = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(resp)) => {
                let status = resp.status();
                HealthReport {
                    healthy: status.is_success(),
                    status: Some(status.as_u16()),
                    latency: start.elapsed(),
                    timed_out: false,
                }
            }
            Ok(Err(e)) => {
                warn!(url = self.url.as_str(), error = %e, "backend health check failed: network error");
                HealthReport {
                    healthy: false,
                    status: None,
                    latency: start.elapsed(),
                    timed_out: e.is_timeout(),
                }
            }
            Err(_) => {
                warn!(
                    url = self.url.as_str(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "backend health check timed out"
                );
                HealthReport {
                    healthy: false,
                    status: None,
                    latency: start.elapsed(),
                    timed_out: true,
                }
            }
        };
        debug!(
            url = self.url.as_str(),
            healthy = report.healthy,
            status = report.status,
            latency_ms = report.latency.as_millis() as u64,
            "health probe finished"
        );
        report
    }
}
