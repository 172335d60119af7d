//! Request execution: single attempts, the retry loop, and fallback helpers.

use crate::headers::X_REQUEST_ID;
use crate::{Error, Result};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::core::MlClient;

impl MlClient {
    /// Single attempt (no retry).
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        self.fetch_with_headers(method, endpoint, body, &HashMap::new())
            .await
    }

    /// Single attempt with caller-supplied headers merged over the fixed set.
    pub async fn fetch_with_headers<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        extra_headers: &HashMap<String, String>,
    ) -> Result<T> {
        let url = self.resolve_url(endpoint)?;
        let request_id = Uuid::new_v4().to_string();
        let mut headers = self.headers.build_async(extra_headers).await?;
        if let Ok(v) = HeaderValue::from_str(&request_id) {
            headers.insert(X_REQUEST_ID, v);
        }

        let start = std::time::Instant::now();
        let resp = self
            .transport
            .send(method.clone(), &url, headers, body)
            .await?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        info!(
            method = %method,
            url = url.as_str(),
            http_status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or(""),
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "ML API response received"
        );

        if resp.url().as_str() != url {
            let final_url = resp.url().to_string();
            let host = resp.url().host_str().unwrap_or("");
            if self.config.is_blocked_redirect_host(host) {
                warn!(url = url.as_str(), final_url = final_url.as_str(), "ML API redirect landed on the marketing site");
            } else {
                info!(url = url.as_str(), final_url = final_url.as_str(), "ML API redirect followed");
            }
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::json!({}))?);
        }

        if !status.is_success() {
            let classification = self.classifier.classify_response(resp, &url).await;
            if let Some(advisory) = classification.advisory.clone() {
                if let Err(e) = self.advisories.notify(advisory).await {
                    warn!(error = %e, "advisory sink rejected notification");
                }
            }
            return classification.into_result();
        }

        let is_json = content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            let text = resp.text().await.unwrap_or_default();
            let preview: String = text.chars().take(200).collect();
            warn!(url = url.as_str(), preview = preview.as_str(), "ML API response is not JSON");
            return Err(Error::UnexpectedContentType {
                url,
                content_type: content_type.unwrap_or_else(|| "unknown type".to_string()),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(crate::transport::TransportError::Http(e)))?;
        let data = serde_json::from_slice(&bytes)?;
        debug!(url = url.as_str(), bytes = bytes.len(), "ML API payload decoded");
        Ok(data)
    }

    /// Run [`fetch`](Self::fetch) under the configured retry policy.
    pub async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        self.retry
            .run(endpoint, |_| self.fetch::<T>(method.clone(), endpoint, body))
            .await
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.fetch(Method::GET, endpoint, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.fetch(Method::POST, endpoint, Some(&body)).await
    }

    /// Retrying GET that degrades to `fallback` on any failure.
    pub async fn fetch_or<T: DeserializeOwned>(&self, endpoint: &str, fallback: T) -> T {
        match self.fetch_with_retry(Method::GET, endpoint, None).await {
            Ok(v) => v,
            Err(e) => {
                warn!(endpoint, error = %e, "ML request failed; using fallback data");
                fallback
            }
        }
    }
}
