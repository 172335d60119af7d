//! Endpoint resolution

use crate::{Error, ErrorContext, Result};
use tracing::warn;

use super::core::MlClient;

impl MlClient {
    /// Resolve an endpoint to the URL that will actually be requested.
    ///
    /// Relative endpoints are joined onto the backend origin. Absolute URLs are
    /// used verbatim in development; in production an absolute URL on another
    /// origin is rewritten onto the configured origin, keeping path and query.
    pub(crate) fn resolve_url(&self, endpoint: &str) -> Result<String> {
        let is_absolute = endpoint.starts_with("http://") || endpoint.starts_with("https://");
        if !is_absolute {
            return Ok(self.config.url_for(endpoint));
        }
        if self.config.dev_mode {
            return Ok(endpoint.to_string());
        }

        let parsed = url::Url::parse(endpoint).map_err(|e| {
            Error::configuration_with_context(
                "endpoint is not a valid URL",
                ErrorContext::new()
                    .with_field_path("endpoint")
                    .with_details(format!("{}: {}", endpoint, e))
                    .with_source("endpoint_resolver"),
            )
        })?;
        let base = url::Url::parse(&self.config.base_url).map_err(|e| {
            Error::configuration_with_context(
                "base_url is not a valid URL",
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(e.to_string())
                    .with_source("endpoint_resolver"),
            )
        })?;
        if parsed.origin() == base.origin() {
            return Ok(endpoint.to_string());
        }

        let mut path = parsed.path().to_string();
        if let Some(q) = parsed.query() {
            path.push('?');
            path.push_str(q);
        }
        warn!(endpoint, rewritten = path.as_str(), "rewriting foreign absolute URL onto ML backend origin");
        Ok(self.config.url_for(&path))
    }
}
