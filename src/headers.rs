//! Canonical request headers for ML backend calls.

use crate::token::TokenStore;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use std::collections::HashMap;
use std::sync::Arc;

pub const X_ML_OPERATION: &str = "x-ml-operation";
pub const X_NO_REDIRECT: &str = "x-no-redirect";
pub const X_ML_CLIENT: &str = "x-ml-client";
pub const X_REQUEST_ID: &str = "x-request-id";

pub const NO_CACHE: &str = "no-cache, no-store";

/// Builds the fixed header set plus caller overrides and the bearer token.
///
/// Output always contains `Content-Type`, `X-ML-Operation`, `X-No-Redirect`,
/// `Cache-Control` and `X-ML-Client`. Caller-supplied entries replace fixed
/// ones with the same name. `Authorization` is present only when the token
/// store holds a token, in which case it always carries that token.
#[derive(Clone)]
pub struct HeaderBuilder {
    client_id: HeaderValue,
    tokens: Arc<dyn TokenStore>,
}

impl HeaderBuilder {
    pub fn new(client_id: &str, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client_id = HeaderValue::from_str(client_id).map_err(|e| {
            Error::configuration_with_context(
                "client id is not a valid header value",
                ErrorContext::new()
                    .with_field_path("config.client_id")
                    .with_details(e.to_string())
                    .with_source("header_builder"),
            )
        })?;
        Ok(Self { client_id, tokens })
    }

    /// Fixed headers only; no caller entries, no token.
    pub fn fixed(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(6);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(X_ML_OPERATION, HeaderValue::from_static("1"));
        headers.insert(X_NO_REDIRECT, HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
        headers.insert(X_ML_CLIENT, self.client_id.clone());
        headers
    }

    /// Merge `extra` into the fixed set and attach the bearer token if stored.
    ///
    /// Reads the token store on the calling thread. Request paths use
    /// [`build_async`](Self::build_async).
    pub fn build(&self, extra: &HashMap<String, String>) -> Result<HeaderMap> {
        self.assemble(extra, self.tokens.token())
    }

    /// [`build`](Self::build) with the token read moved onto tokio's blocking
    /// pool, so keyring and file stores never stall the async workers.
    pub async fn build_async(&self, extra: &HashMap<String, String>) -> Result<HeaderMap> {
        let tokens = Arc::clone(&self.tokens);
        let token = tokio::task::spawn_blocking(move || tokens.token())
            .await
            .map_err(|e| {
                Error::configuration_with_context(
                    "token store read did not complete",
                    ErrorContext::new()
                        .with_field_path("token")
                        .with_details(e.to_string())
                        .with_source("header_builder"),
                )
            })?;
        self.assemble(extra, token)
    }

    fn assemble(&self, extra: &HashMap<String, String>, token: Option<String>) -> Result<HeaderMap> {
        let mut headers = self.fixed();

        // Sorted so that differently-cased duplicates resolve the same way on every call.
        let mut entries: Vec<(&String, &String)> = extra.iter().collect();
        entries.sort();
        for (name, value) in entries {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        headers.remove(AUTHORIZATION);
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                Error::configuration_with_context(
                    "stored token is not a valid header value",
                    ErrorContext::new()
                        .with_field_path("token")
                        .with_details(e.to_string())
                        .with_source("header_builder"),
                )
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Same as [`build`](Self::build) without caller entries.
    pub fn build_default(&self) -> Result<HeaderMap> {
        self.build(&HashMap::new())
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let parsed_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        Error::configuration_with_context(
            "invalid header name",
            ErrorContext::new()
                .with_field_path(format!("headers.{}", name))
                .with_details(e.to_string())
                .with_source("header_builder"),
        )
    })?;
    let parsed_value = HeaderValue::from_str(value).map_err(|e| {
        Error::configuration_with_context(
            "invalid header value",
            ErrorContext::new()
                .with_field_path(format!("headers.{}", name))
                .with_details(e.to_string())
                .with_source("header_builder"),
        )
    })?;
    Ok((parsed_name, parsed_value))
}
