use crate::config::MlConfig;
use crate::transport::TransportError;
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{redirect, Method};
use std::time::Duration;
use tracing::debug;

/// Pooled reqwest clients configured for the ML backend.
///
/// `client` applies the request timeout and the redirect policy (follow in
/// development, refuse in production). `manual_redirects` never follows
/// redirects so diagnostics can observe them.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    manual_redirects: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &MlConfig) -> Result<Self> {
        let pool_idle = std::env::var("GAMEPATH_HTTP_POOL_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(90);

        let policy = if config.dev_mode {
            redirect::Policy::limited(10)
        } else {
            redirect::Policy::custom(|attempt| attempt.error("redirects are blocked for ML requests"))
        };

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .pool_idle_timeout(Some(Duration::from_secs(pool_idle)))
            .redirect(policy)
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        let manual_redirects = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            manual_redirects,
            timeout: config.request_timeout(),
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn manual_redirect_client(&self) -> &reqwest::Client {
        &self.manual_redirects
    }

    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        debug!(method = %method, url, "sending ML request");
        let mut req = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send().await.map_err(|e| self.map_error(e, url))
    }

    fn map_error(&self, e: reqwest::Error, url: &str) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if e.is_redirect() {
            Error::RedirectBlocked {
                url: url.to_string(),
            }
        } else {
            Error::Transport(TransportError::Http(e))
        }
    }
}
