//! # gamepath-ml-client
//!
//! Resilient async client for the GamePath AI machine-learning backend.
//!
//! ## Overview
//!
//! The backend serves route optimization, performance prediction and game
//! detection models under a common path prefix. This crate is the access
//! layer in front of it: it builds the canonical request headers, probes
//! liveness within a bounded time, classifies failed responses into a small
//! taxonomy, and retries transient failures under an explicit policy.
//!
//! ## Key Features
//!
//! - **Header Builder**: [`HeaderBuilder`] merges fixed headers, caller
//!   overrides and the stored bearer token
//! - **Health Prober**: [`HealthProber`] resolves to a boolean and cancels the
//!   request when the timeout wins
//! - **Error Classifier**: [`ErrorClassifier`] tags failures as
//!   `backend-unreachable`, `malformed-payload` or `generic-api-error`
//! - **Retry Policy**: [`resilience::RetryPolicy`] with fixed or exponential backoff
//! - **Advisories**: [`advisory::AdvisorySink`] receives user-facing hints
//!   instead of the classifier raising notifications itself
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gamepath_ml_client::{MlClientBuilder, MlConfig};
//!
//! #[tokio::main]
//! async fn main() -> gamepath_ml_client::Result<()> {
//!     let client = MlClientBuilder::new()
//!         .config(MlConfig::new("http://127.0.0.1:8000"))
//!         .build()?;
//!
//!     if client.is_backend_running().await {
//!         let games = client.service().detect_games().await;
//!         println!("{} games detected", games.detected_games.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Explicit configuration, env overrides, YAML loading |
//! | [`headers`] | Canonical request headers |
//! | [`token`] | Read-only bearer token sources |
//! | [`health`] | Bounded-time liveness probe |
//! | [`client`] | Request execution and error classification |
//! | [`resilience`] | Retry policy |
//! | [`service`] | Typed model operations |
//! | [`diagnostics`] | Connectivity and redirect checks |
//! | [`advisory`] | Advisory notification sinks |

pub mod advisory;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod headers;
pub mod health;
pub mod resilience;
pub mod service;
pub mod token;
pub mod transport;

pub use advisory::{Advisory, AdvisorySink};
pub use client::{
    Classification, ClassifiedError, ErrorClassifier, ErrorKind, MlClient, MlClientBuilder,
};
pub use config::{MlConfig, RetryConfig};
pub use headers::HeaderBuilder;
pub use health::{HealthProber, HealthReport};
pub use service::MlService;
pub use token::TokenStore;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
