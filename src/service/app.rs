//! Main application state
//!
//! Holds the configuration, the dashboard wiring and the metrics collector
//! shared by every request. Nothing in here is mutated per render.

use crate::config::AppConfig;
use crate::error::BoardError;
use crate::metrics::MetricsCollector;
use crate::report::{Dashboard, DashboardReport};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("HTTP server error: {message}")]
    Server { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Score sources and dashboard settings
    dashboard: Dashboard,

    /// Metrics for renders and health
    metrics: Arc<MetricsCollector>,

    /// Service start time
    started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Initialize the application from configuration
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!(
            "Initializing prediction board: service={}, scores={}",
            config.service.name,
            config.data.scores_file.display()
        );

        crate::config::validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let dashboard = Dashboard::from_config(&config);
        Self::with_dashboard(config, dashboard)
    }

    /// Initialize with an already wired dashboard
    pub fn with_dashboard(config: AppConfig, dashboard: Dashboard) -> Result<Self, ServiceError> {
        let metrics =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        Ok(Self {
            config,
            dashboard,
            metrics,
            started_at: crate::utils::current_timestamp(),
        })
    }

    /// Build a fresh dashboard report and record its outcome
    pub fn render(&self) -> Result<DashboardReport, BoardError> {
        let timer = self.metrics.start_timer();
        let result = self.dashboard.build();
        let duration = timer.stop();

        match &result {
            Ok(report) => {
                debug!(
                    "Dashboard rendered in {:.2}ms with {} notices",
                    duration.as_secs_f64() * 1000.0,
                    report.notices.len()
                );
                self.metrics.record_report(report, duration);
            }
            Err(e) => {
                error!(
                    "Dashboard render failed in {:.2}ms: {}",
                    duration.as_secs_f64() * 1000.0,
                    e
                );
                self.metrics.record_render_failure(e, duration);
            }
        }

        if let Some(stats) = self.dashboard.current_source().cache_stats() {
            self.metrics.update_cache_stats(stats);
        }

        result
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the dashboard wiring
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Get metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Human readable uptime
    pub fn uptime_info(&self) -> String {
        let elapsed = crate::utils::current_timestamp() - self.started_at;
        format!(
            "Up {}h {}m {}s",
            elapsed.num_hours(),
            elapsed.num_minutes() % 60,
            elapsed.num_seconds() % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{InMemorySnapshotSource, SnapshotSource};
    use crate::trend::WindowSettings;
    use crate::types::{PlayerRecord, Snapshot};
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn state_with(source: InMemorySnapshotSource) -> AppState {
        let dashboard = Dashboard::new(
            "Test",
            Arc::new(source) as Arc<dyn SnapshotSource>,
            None,
            WindowSettings::default(),
        );
        AppState::with_dashboard(AppConfig::default(), dashboard).unwrap()
    }

    #[test]
    fn test_render_records_success() {
        let snapshot = Snapshot::new(
            vec!["G1".to_string()],
            vec![PlayerRecord::new("Asha", vec![dec!(2)])],
        )
        .unwrap();
        let state = state_with(InMemorySnapshotSource::new(snapshot));

        let report = state.render().unwrap();

        assert_eq!(report.players.len(), 1);
        // One game is too few for a trend, so the render carries a notice
        assert_eq!(
            state
                .metrics()
                .render()
                .renders_total
                .with_label_values(&["warning"])
                .get(),
            1
        );
        assert_eq!(state.metrics().snapshot().players.get(), 1);
    }

    #[test]
    fn test_render_records_failure() {
        let state = state_with(InMemorySnapshotSource::failing(BoardError::FileNotFound {
            path: PathBuf::from("points.csv"),
        }));

        assert!(state.render().is_err());
        assert_eq!(
            state
                .metrics()
                .render()
                .renders_total
                .with_label_values(&["blocking"])
                .get(),
            1
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.service.http_port = 0;
        assert!(matches!(
            AppState::new(config),
            Err(ServiceError::Configuration { .. })
        ));
    }
}
