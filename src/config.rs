//! Explicit configuration for the ML access layer.
//!
//! Every component takes its settings from an [`MlConfig`] passed at
//! construction time. Defaults mirror the reference backend deployment
//! (local backend on port 8000, `/ml` prefix, 2 retries 2 s apart, 20 s
//! request timeout, 5 s health timeout). Values can be overridden from the
//! environment or loaded from a YAML file.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PREFIX: &str = "/ml";
pub const DEFAULT_CLIENT_ID: &str = "gamepath-rust-client";
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5_000;

/// Backoff shape between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// `delay * 2^attempt`, capped at `max_delay_ms`.
    Exponential,
}

/// Retry settings for backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub delay_ms: u64,
    pub backoff: BackoffKind,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
            backoff: BackoffKind::Fixed,
            max_delay_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl RetryConfig {
    /// No retries at all; every call is a single attempt.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms.max(self.delay_ms))
    }
}

/// Configuration shared by the header builder, health prober, classifier and client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlConfig {
    /// Origin of the backend, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Path prefix under which all ML endpoints live.
    pub prefix: String,
    /// Development mode: 404 means "backend not started" and redirects are followed.
    pub dev_mode: bool,
    /// Value of the `X-ML-Client` identity header.
    pub client_id: String,
    pub retry: RetryConfig,
    /// Per-attempt request timeout.
    pub request_timeout_ms: u64,
    pub health_timeout_ms: u64,
    /// Hosts that indicate the request was bounced to the marketing site.
    pub blocked_redirect_hosts: Vec<String>,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            dev_mode: false,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            retry: RetryConfig::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            health_timeout_ms: DEFAULT_HEALTH_TIMEOUT_MS,
            blocked_redirect_hosts: vec!["gamepathai.com".to_string(), "gamepath.ai".to_string()],
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl MlConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `GAMEPATH_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of the current values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("GAMEPATH_ML_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(prefix) = env::var("GAMEPATH_ML_PREFIX") {
            self.prefix = prefix;
        }
        if let Some(dev) = env_flag("GAMEPATH_ML_DEV") {
            self.dev_mode = dev;
        } else if env::var("GAMEPATH_ENV").ok().as_deref() == Some("development") {
            self.dev_mode = true;
        }
        if let Ok(id) = env::var("GAMEPATH_ML_CLIENT_ID") {
            self.client_id = id;
        }
        if let Some(n) = env_u64("GAMEPATH_ML_MAX_RETRIES") {
            self.retry.max_retries = n.min(u32::MAX as u64) as u32;
        }
        if let Some(ms) = env_u64("GAMEPATH_ML_RETRY_DELAY_MS") {
            self.retry.delay_ms = ms;
        }
        if let Some(ms) = env_u64("GAMEPATH_ML_TIMEOUT_MS") {
            self.request_timeout_ms = ms;
        }
        if let Some(ms) = env_u64("GAMEPATH_ML_HEALTH_TIMEOUT_MS") {
            self.health_timeout_ms = ms;
        }
        self
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: MlConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "base_url is not a valid URL",
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(e.to_string())
                    .with_source("config"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "base_url must use http or https",
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(parsed.scheme().to_string())
                    .with_source("config"),
            ));
        }
        if self.request_timeout_ms == 0 || self.health_timeout_ms == 0 {
            return Err(Error::configuration_with_context(
                "timeouts must be greater than zero",
                ErrorContext::new()
                    .with_field_path("config.request_timeout_ms")
                    .with_source("config"),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    /// Normalized prefix: leading slash, no trailing slash, empty for root.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.prefix.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Absolute URL for a path relative to the backend origin.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Path of an endpoint under the ML prefix, e.g. `ml_path("/health")` -> `/ml/health`.
    pub fn ml_path(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        format!("{}/{}", self.normalized_prefix(), endpoint)
    }

    pub fn health_url(&self) -> String {
        self.url_for(&self.ml_path("health"))
    }

    /// Whether `host` is one of the blocked redirect hosts or a subdomain of one.
    pub fn is_blocked_redirect_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }
        self.blocked_redirect_hosts.iter().any(|blocked| {
            let blocked = blocked.trim_end_matches('.').to_ascii_lowercase();
            host == blocked || host.ends_with(&format!(".{}", blocked))
        })
    }
}
