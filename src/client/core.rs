use crate::advisory::AdvisorySink;
use crate::client::error_classification::ErrorClassifier;
use crate::config::MlConfig;
use crate::headers::HeaderBuilder;
use crate::health::{HealthProber, HealthReport};
use crate::resilience::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;

/// Client for the ML backend.
///
/// Cheap to clone; clones share the connection pool, token store and
/// advisory sink.
#[derive(Clone)]
pub struct MlClient {
    pub(crate) config: Arc<MlConfig>,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) headers: HeaderBuilder,
    pub(crate) classifier: ErrorClassifier,
    pub(crate) retry: RetryPolicy,
    pub(crate) advisories: Arc<dyn AdvisorySink>,
    pub(crate) health: HealthProber,
}

impl MlClient {
    /// Client with the given configuration and default collaborators.
    pub fn new(config: MlConfig) -> Result<Self> {
        crate::client::builder::MlClientBuilder::new()
            .config(config)
            .build()
    }

    /// Client configured from `GAMEPATH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(MlConfig::from_env())
    }

    pub fn config(&self) -> &MlConfig {
        &self.config
    }

    pub fn header_builder(&self) -> &HeaderBuilder {
        &self.headers
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn health_prober(&self) -> &HealthProber {
        &self.health
    }

    /// Bounded-time liveness check; never fails.
    pub async fn is_backend_running(&self) -> bool {
        self.health.is_backend_running().await
    }

    pub async fn probe_health(&self) -> HealthReport {
        self.health.probe().await
    }

    /// Typed operations for the backend models.
    pub fn service(&self) -> crate::service::MlService {
        crate::service::MlService::new(self.clone())
    }

    /// Connectivity and redirect diagnostics.
    pub fn diagnostics(&self) -> crate::diagnostics::Diagnostics {
        crate::diagnostics::Diagnostics::new(self.clone())
    }
}
