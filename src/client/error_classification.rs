//! Error classification for failed ML backend responses.

use crate::advisory::Advisory;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{error, warn};

/// Message returned when a development backend is missing.
pub const BACKEND_NOT_RUNNING: &str = "Backend not running - start with backend/start.sh";

/// Cause tag of a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 404 in development mode: the backend process is not started.
    BackendUnreachable,
    /// The backend answered with an HTML page instead of a data payload.
    MalformedPayload,
    /// Any other non-success status.
    GenericApiError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BackendUnreachable => "backend-unreachable",
            ErrorKind::MalformedPayload => "malformed-payload",
            ErrorKind::GenericApiError => "generic-api-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed backend response, reduced to a taxonomy tag plus best-effort detail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} (status {status}): {message}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
    pub url: String,
    /// Fields of the JSON error body, when it parsed as an object.
    pub fields: Map<String, Value>,
}

impl ClassifiedError {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The conventional `detail` field of the error body.
    pub fn detail(&self) -> Option<&str> {
        self.field("detail").and_then(Value::as_str)
    }

    /// Rate limiting and server-side failures may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::GenericApiError && (self.status == 429 || self.status >= 500)
    }
}

/// Result of classifying one failed response.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub error: ClassifiedError,
    /// Hint for the user; delivering it is up to the caller.
    pub advisory: Option<Advisory>,
}

impl Classification {
    /// Always an error: a classified response is a guaranteed failure.
    pub fn into_result<T>(self) -> crate::Result<T> {
        Err(crate::Error::Classified(self.error))
    }
}

/// Turns failed responses into [`ClassifiedError`]s.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier {
    dev_mode: bool,
}

impl ErrorClassifier {
    pub fn new(dev_mode: bool) -> Self {
        Self { dev_mode }
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Classify from already-read response parts.
    pub fn classify_parts(
        &self,
        status: u16,
        content_type: Option<&str>,
        body: &[u8],
        url: &str,
    ) -> Classification {
        if status == 404 && self.dev_mode {
            warn!(url, "ML endpoint not found; is the backend running?");
            return Classification {
                error: ClassifiedError {
                    kind: ErrorKind::BackendUnreachable,
                    status,
                    message: BACKEND_NOT_RUNNING.to_string(),
                    url: url.to_string(),
                    fields: Map::new(),
                },
                advisory: Some(Advisory::backend_not_detected(url)),
            };
        }

        if is_html(content_type) {
            error!(http_status = status, url, "ML API returned HTML instead of JSON");
            return Classification {
                error: ClassifiedError {
                    kind: ErrorKind::MalformedPayload,
                    status,
                    message: format!("ML API returned HTML instead of JSON (status {})", status),
                    url: url.to_string(),
                    fields: Map::new(),
                },
                advisory: None,
            };
        }

        let error = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => {
                error!(http_status = status, url, body = ?fields, "ML API error response");
                let message = ["detail", "message", "error"]
                    .iter()
                    .find_map(|k| fields.get(*k).and_then(Value::as_str))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("ML API error (status {})", status));
                ClassifiedError {
                    kind: ErrorKind::GenericApiError,
                    status,
                    message,
                    url: url.to_string(),
                    fields,
                }
            }
            _ => {
                error!(http_status = status, url, "ML API error with unparsable body");
                ClassifiedError {
                    kind: ErrorKind::GenericApiError,
                    status,
                    message: format!("ML API error (status {})", status),
                    url: url.to_string(),
                    fields: Map::new(),
                }
            }
        };
        Classification {
            error,
            advisory: None,
        }
    }

    /// Read the response and classify it.
    pub async fn classify_response(&self, response: reqwest::Response, url: &str) -> Classification {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // Skip the body when it cannot change the outcome.
        let body = if (status == 404 && self.dev_mode) || is_html(content_type.as_deref()) {
            Vec::new()
        } else {
            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .unwrap_or_default()
        };
        self.classify_parts(status, content_type.as_deref(), &body, url)
    }

    /// Classify and return the error. Never returns `Ok`.
    pub async fn fail<T>(&self, response: reqwest::Response, url: &str) -> crate::Result<T> {
        self.classify_response(response, url).await.into_result()
    }
}

fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}
