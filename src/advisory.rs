//! Advisory notifications: non-fatal hints meant for the user.
//!
//! Classification never notifies anybody by itself. It hands back an
//! [`Advisory`] and the client forwards it to whichever [`AdvisorySink`] the
//! application installed (a toast, a status line, a log).

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

fn timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub title: String,
    pub description: String,
    /// URL of the request that prompted the advisory.
    pub url: Option<String>,
    pub timestamp: f64,
}

impl Advisory {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: None,
            timestamp: timestamp(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The "start your backend" hint raised for a development-mode 404.
    pub fn backend_not_detected(url: impl Into<String>) -> Self {
        Self::new(
            "Backend not detected",
            "Ensure the ML backend is running on port 8000",
        )
        .with_url(url)
    }
}

/// Advisory sink trait.
#[async_trait]
pub trait AdvisorySink: Send + Sync {
    async fn notify(&self, advisory: Advisory) -> Result<()>;
}

pub struct NoopAdvisorySink;

#[async_trait]
impl AdvisorySink for NoopAdvisorySink {
    async fn notify(&self, _: Advisory) -> Result<()> {
        Ok(())
    }
}

pub fn noop_sink() -> Arc<dyn AdvisorySink> {
    Arc::new(NoopAdvisorySink)
}

/// Emits advisories as `WARN` tracing events.
pub struct TracingAdvisorySink;

#[async_trait]
impl AdvisorySink for TracingAdvisorySink {
    async fn notify(&self, advisory: Advisory) -> Result<()> {
        warn!(
            title = advisory.title.as_str(),
            url = advisory.url.as_deref().unwrap_or(""),
            "{}",
            advisory.description
        );
        Ok(())
    }
}

/// Bounded in-memory sink, handy for tests and status panels.
pub struct InMemoryAdvisorySink {
    advisories: RwLock<Vec<Advisory>>,
    max: usize,
}

impl InMemoryAdvisorySink {
    pub fn new(max: usize) -> Self {
        Self {
            advisories: RwLock::new(Vec::new()),
            max: max.max(1),
        }
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        self.advisories
            .read()
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.advisories.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut a) = self.advisories.write() {
            a.clear();
        }
    }
}

#[async_trait]
impl AdvisorySink for InMemoryAdvisorySink {
    async fn notify(&self, advisory: Advisory) -> Result<()> {
        if let Ok(mut a) = self.advisories.write() {
            a.push(advisory);
            if a.len() > self.max {
                a.remove(0);
            }
        }
        Ok(())
    }
}
