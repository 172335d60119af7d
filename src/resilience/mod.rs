//! # Resilience Module
//!
//! Retry policy for calls to the ML backend.
//!
//! Only transient failures are retried: transport errors, timeouts, and
//! generic API errors with status 429 or 5xx. A missing development backend,
//! HTML error pages, blocked redirects and other 4xx responses fail
//! immediately.
//!
//! ```rust
//! use gamepath_ml_client::config::RetryConfig;
//! use gamepath_ml_client::resilience::retry::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::from_config(&RetryConfig::default());
//! assert_eq!(policy.max_retries, 2);
//! assert_eq!(policy.backoff_delay(0), Duration::from_millis(2000));
//! ```

pub mod retry;

pub use retry::{Decision, RetryPolicy};
