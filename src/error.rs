use crate::client::error_classification::ClassifiedError;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for configuration and request failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Configuration key or request field that caused the error (e.g., "config.base_url").
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the offending value).
    pub details: Option<String>,
    /// Component that raised the error (e.g., "header_builder", "config").
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the ML access layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ML API error: {0}")]
    Classified(#[from] ClassifiedError),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Blocked redirect while requesting {url}")]
    RedirectBlocked { url: String },

    #[error("ML API did not return JSON content (got {content_type})")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The classified backend error, when the failure came from a non-success response.
    pub fn classified(&self) -> Option<&ClassifiedError> {
        match self {
            Error::Classified(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        self.classified().map(|e| e.status)
    }

    /// Whether a failed attempt is worth repeating.
    ///
    /// Only transient conditions qualify: transport failures, timeouts, and
    /// generic API errors with status 429 or 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout { .. } => true,
            Error::Classified(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether the failure is related to redirect handling.
    pub fn is_redirect(&self) -> bool {
        match self {
            Error::RedirectBlocked { .. } => true,
            Error::Transport(TransportError::Http(e)) => e.is_redirect(),
            _ => false,
        }
    }
}
