//! Shared latest-reading and health state
//!
//! The polling loop writes here and status reporters read from here. The
//! state sits behind an `RwLock` inside an `Arc`; clones of the holder share
//! the same state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

use crate::app::models::Reading;

/// Result of a health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub details: String,
}

impl Health {
    pub fn healthy() -> Self {
        Self {
            ok: true,
            details: String::new(),
        }
    }

    pub fn unhealthy(details: impl Into<String>) -> Self {
        Self {
            ok: false,
            details: details.into(),
        }
    }
}

/// Latest reading and the health recorded alongside it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Most recent successfully parsed reading
    pub latest: Option<Reading>,

    /// Health as of the last loop event; `None` before the first event
    pub health: Option<Health>,
}

/// Serializable status as published by reporters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub health: Option<Health>,
    pub reading: Option<Reading>,
}

impl Status {
    /// Health at `now`, downgraded when the latest reading is older than `max_age`
    pub fn health_at(&self, now: DateTime<Utc>, max_age: Duration) -> Option<Health> {
        let health = self.health.clone()?;
        if !health.ok {
            return Some(health);
        }

        if let Some(reading) = &self.latest {
            let age = now.signed_duration_since(reading.captured_at());
            if matches!(age.to_std(), Ok(age) if age > max_age) {
                return Some(Health::unhealthy(format!(
                    "Data is older than {}s",
                    max_age.as_secs()
                )));
            }
        }

        Some(health)
    }

    /// Build the report published at `now`
    pub fn report(&self, now: DateTime<Utc>, max_age: Duration) -> StatusReport {
        StatusReport {
            health: self.health_at(now, max_age),
            reading: self.latest.clone(),
        }
    }
}

/// Shared handle to the status
#[derive(Debug, Clone, Default)]
pub struct StatusHolder {
    inner: Arc<RwLock<Status>>,
}

impl StatusHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest reading and mark the loop healthy
    pub fn record_reading(&self, reading: Reading) {
        let mut status = self.inner.write().unwrap_or_else(|e| e.into_inner());
        status.latest = Some(reading);
        status.health = Some(Health::healthy());
    }

    /// Mark the loop unhealthy, keeping the last good reading
    pub fn record_error(&self, details: impl Into<String>) {
        let details = details.into();
        debug!("Recording unhealthy status: {}", details);
        let mut status = self.inner.write().unwrap_or_else(|e| e.into_inner());
        status.health = Some(Health::unhealthy(details));
    }

    /// Copy of the current status
    pub fn snapshot(&self) -> Status {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
