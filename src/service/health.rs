//! Health checks
//!
//! This module provides health check functionality for the prediction
//! board: whether the score sheets can be loaded and ranked.

use crate::error::Severity;
use crate::loader::SnapshotSource;
use crate::service::app::AppState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Numeric value used for the health gauge
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }

    fn worst(self, other: HealthStatus) -> HealthStatus {
        match (self, other) {
            (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            (HealthStatus::Degraded, _) | (_, HealthStatus::Degraded) => HealthStatus::Degraded,
            _ => HealthStatus::Healthy,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Service uptime information
    pub uptime_info: String,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if not healthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

impl HealthCheck {
    /// Check that the score sheets load and the current one can be ranked
    pub fn check(app_state: &AppState) -> Self {
        let mut checks = Vec::new();

        // A missing or malformed current sheet makes the dashboard useless;
        // an unrankable one still renders with warnings.
        checks.push(Self::check_source(
            "scores_file",
            app_state.dashboard().current_source().as_ref(),
            HealthStatus::Unhealthy,
        ));

        if let Some(previous) = app_state.dashboard().previous_source() {
            checks.push(Self::check_source(
                "previous_scores_file",
                previous.as_ref(),
                HealthStatus::Degraded,
            ));
        }

        let status = checks
            .iter()
            .fold(HealthStatus::Healthy, |acc, check| acc.worst(check.status.clone()));

        let metrics = app_state.metrics();
        metrics.update_health_status(status.as_gauge());
        for check in &checks {
            metrics.update_component_health(&check.name, check.status == HealthStatus::Healthy);
        }

        HealthCheck {
            status,
            service: app_state.config().service.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            uptime_info: app_state.uptime_info(),
        }
    }

    /// Readiness check - the current sheet must load
    pub fn readiness_check(app_state: &AppState) -> HealthStatus {
        match app_state.dashboard().current_source().load() {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => {
                debug!("Readiness check failed: {}", e);
                HealthStatus::Unhealthy
            }
        }
    }

    /// Load a source and grade the outcome
    fn check_source(
        name: &str,
        source: &dyn SnapshotSource,
        on_failure: HealthStatus,
    ) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match source.load() {
            Ok(snapshot) => match snapshot.ensure_rankable() {
                Ok(()) => (HealthStatus::Healthy, None),
                Err(e) => (HealthStatus::Degraded, Some(e.to_string())),
            },
            Err(e) if e.severity() == Severity::Blocking => (on_failure, Some(e.to_string())),
            Err(e) => (HealthStatus::Degraded, Some(e.to_string())),
        };

        debug!("Health of {} ({}): {}", name, source.describe(), status);

        ComponentCheck {
            name: name.to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}
