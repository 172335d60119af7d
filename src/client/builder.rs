use crate::advisory::AdvisorySink;
use crate::client::core::MlClient;
use crate::client::error_classification::ErrorClassifier;
use crate::config::{MlConfig, RetryConfig};
use crate::headers::HeaderBuilder;
use crate::health::HealthProber;
use crate::resilience::retry::RetryPolicy;
use crate::token::TokenStore;
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
pub struct MlClientBuilder {
    config: Option<MlConfig>,
    base_url_override: Option<String>,
    dev_mode: Option<bool>,
    retry: Option<RetryConfig>,
    tokens: Option<Arc<dyn TokenStore>>,
    advisories: Arc<dyn AdvisorySink>,
}

impl Default for MlClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MlClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            base_url_override: None,
            dev_mode: None,
            retry: None,
            tokens: None,
            advisories: crate::advisory::noop_sink(),
        }
    }

    /// Start from an explicit configuration instead of `MlConfig::from_env()`.
    pub fn config(mut self, config: MlConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the backend origin (primarily for testing with mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn dev_mode(mut self, enable: bool) -> Self {
        self.dev_mode = Some(enable);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Token source for the `Authorization` header. Default: keyring, then env.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(store);
        self
    }

    /// Inject an advisory sink. Default is a no-op sink.
    pub fn advisory_sink(mut self, sink: Arc<dyn AdvisorySink>) -> Self {
        self.advisories = sink;
        self
    }

    pub fn build(self) -> Result<MlClient> {
        let mut config = self.config.unwrap_or_else(MlConfig::from_env);
        if let Some(url) = self.base_url_override {
            config.base_url = url;
        }
        if let Some(dev) = self.dev_mode {
            config.dev_mode = dev;
        }
        if let Some(retry) = self.retry {
            config.retry = retry;
        }
        config.validate()?;

        let transport = Arc::new(HttpTransport::new(&config)?);
        let tokens = self.tokens.unwrap_or_else(crate::token::default_token_store);
        let headers = HeaderBuilder::new(&config.client_id, tokens)?;
        let health = HealthProber::from_config(transport.client().clone(), &config);

        Ok(MlClient {
            classifier: ErrorClassifier::new(config.dev_mode),
            retry: RetryPolicy::from_config(&config.retry),
            config: Arc::new(config),
            transport,
            headers,
            advisories: self.advisories,
            health,
        })
    }
}
