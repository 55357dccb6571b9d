//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for dashboard renders, snapshot
//! loading and service health.

use crate::error::BoardError;
use crate::loader::CacheStats;
use crate::report::DashboardReport;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the prediction board
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Render-related metrics
    render_metrics: RenderMetrics,

    /// Snapshot-related metrics
    snapshot_metrics: SnapshotMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

/// Render-related metrics
#[derive(Clone)]
pub struct RenderMetrics {
    /// Dashboard renders by outcome (ok, warning, blocking)
    pub renders_total: IntCounterVec,

    /// Errors and notices by kind
    pub errors_total: IntCounterVec,

    /// Player lookups that named an unknown player
    pub lookup_misses_total: IntCounter,

    /// Time spent building a dashboard report
    pub render_duration: Histogram,
}

/// Snapshot-related metrics
#[derive(Clone)]
pub struct SnapshotMetrics {
    /// Players in the last rendered snapshot
    pub players: IntGauge,

    /// Games in the last rendered snapshot
    pub games: IntGauge,

    /// Snapshot cache lookups by result (hit, miss)
    pub cache_lookups: IntGaugeVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let render_metrics = RenderMetrics::new(&registry)?;
        let snapshot_metrics = SnapshotMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            render_metrics,
            snapshot_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get render metrics
    pub fn render(&self) -> &RenderMetrics {
        &self.render_metrics
    }

    /// Get snapshot metrics
    pub fn snapshot(&self) -> &SnapshotMetrics {
        &self.snapshot_metrics
    }

    /// Record a successfully built report, with or without notices
    pub fn record_report(&self, report: &DashboardReport, duration: Duration) {
        let outcome = if report.has_warnings() { "warning" } else { "ok" };

        self.render_metrics
            .renders_total
            .with_label_values(&[outcome])
            .inc();

        for notice in &report.notices {
            self.render_metrics
                .errors_total
                .with_label_values(&[notice.kind.as_str()])
                .inc();
        }

        self.snapshot_metrics
            .players
            .set(report.players.len() as i64);
        self.snapshot_metrics.games.set(report.games.len() as i64);

        self.render_metrics
            .render_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a render that failed with a blocking error
    pub fn record_render_failure(&self, error: &BoardError, duration: Duration) {
        self.render_metrics
            .renders_total
            .with_label_values(&["blocking"])
            .inc();

        self.render_metrics
            .errors_total
            .with_label_values(&[error.kind()])
            .inc();

        self.render_metrics
            .render_duration
            .observe(duration.as_secs_f64());
    }

    /// Record a player lookup for an unknown name
    pub fn record_lookup_miss(&self) {
        self.render_metrics.lookup_misses_total.inc();
    }

    /// Publish snapshot cache statistics
    pub fn update_cache_stats(&self, stats: CacheStats) {
        self.snapshot_metrics
            .cache_lookups
            .with_label_values(&["hit"])
            .set(stats.hits as i64);
        self.snapshot_metrics
            .cache_lookups
            .with_label_values(&["miss"])
            .set(stats.misses as i64);
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let health_status = IntGauge::new(
            "prediction_board_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new(
                "prediction_board_component_health",
                "Component health status",
            ),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            health_status,
            component_health,
        })
    }
}

impl RenderMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let renders_total = IntCounterVec::new(
            Opts::new(
                "prediction_board_renders_total",
                "Dashboard renders by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(renders_total.clone()))?;

        let errors_total = IntCounterVec::new(
            Opts::new(
                "prediction_board_errors_total",
                "Render errors and notices by kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(errors_total.clone()))?;

        let lookup_misses_total = IntCounter::new(
            "prediction_board_lookup_misses_total",
            "Player lookups for unknown names",
        )?;
        registry.register(Box::new(lookup_misses_total.clone()))?;

        let render_duration = Histogram::with_opts(
            HistogramOpts::new(
                "prediction_board_render_duration_seconds",
                "Time spent building a dashboard report",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(render_duration.clone()))?;

        Ok(Self {
            renders_total,
            errors_total,
            lookup_misses_total,
            render_duration,
        })
    }
}

impl SnapshotMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let players = IntGauge::new(
            "prediction_board_snapshot_players",
            "Players in the last rendered snapshot",
        )?;
        registry.register(Box::new(players.clone()))?;

        let games = IntGauge::new(
            "prediction_board_snapshot_games",
            "Games in the last rendered snapshot",
        )?;
        registry.register(Box::new(games.clone()))?;

        let cache_lookups = IntGaugeVec::new(
            Opts::new(
                "prediction_board_snapshot_cache_lookups",
                "Snapshot cache lookups by result",
            ),
            &["result"],
        )?;
        registry.register(Box::new(cache_lookups.clone()))?;

        Ok(Self {
            players,
            games,
            cache_lookups,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
