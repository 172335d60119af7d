//! Retry policy for backend calls.
//!
//! Decides, after a failed attempt, whether to try again and how long to wait.
//! The loop itself is [`RetryPolicy::run`]; it is used by
//! `MlClient::fetch_with_retry` and everything built on top of it.

use crate::config::{BackoffKind, RetryConfig};
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Retry { delay: Duration },
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
    pub backoff: BackoffKind,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            delay: cfg.delay(),
            backoff: cfg.backoff,
            max_delay: cfg.max_delay(),
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::from_config(&RetryConfig::disabled())
    }

    /// Delay before retry number `attempt + 1` (`attempt` is 0-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            BackoffKind::Fixed => self.delay,
            BackoffKind::Exponential => {
                let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
                self.delay.saturating_mul(factor).min(self.max_delay)
            }
        }
    }

    /// - `attempt` is 0-based (first failure => attempt=0).
    pub fn decide(&self, err: &Error, attempt: u32) -> Decision {
        if err.is_retryable() && attempt < self.max_retries {
            Decision::Retry {
                delay: self.backoff_delay(attempt),
            }
        } else {
            Decision::Fail
        }
    }

    /// Run `op` until it succeeds, fails permanently, or retries are exhausted.
    ///
    /// `op` receives the 0-based attempt number.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            match op(attempt).await {
                Ok(v) => {
                    if attempt > 0 {
                        info!(endpoint = label, attempts = attempt + 1, "ML request succeeded after retry");
                    }
                    return Ok(v);
                }
                Err(e) => match self.decide(&e, attempt) {
                    Decision::Retry { delay } => {
                        warn!(
                            endpoint = label,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "retrying ML operation"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Decision::Fail => return Err(e),
                },
            }
        }
    }
}
