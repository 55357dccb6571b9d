//! Metrics for the prediction board
//!
//! Prometheus collectors for dashboard renders, loaded snapshots and
//! service health. They are exposed over HTTP by [`crate::web`].

pub mod collector;

pub use collector::{MetricsCollector, MetricsTimer, RenderMetrics, ServiceMetrics, SnapshotMetrics};
