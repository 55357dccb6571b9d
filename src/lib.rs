//! Prediction Board - leaderboard dashboard for prediction contests
//!
//! This crate loads a player-by-game points sheet, ranks players by total
//! points, tracks rank movement against a previous sheet, and charts the
//! recent title race. Results are served as an HTML dashboard and JSON.

pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod ranking;
pub mod report;
pub mod service;
pub mod trend;
pub mod types;
pub mod utils;
pub mod web;

// Re-export commonly used types and traits
pub use error::{BoardError, Result, Severity};
pub use types::*;

// Re-export key components
pub use loader::{FileSnapshotSource, SnapshotSource};
pub use report::{Dashboard, DashboardReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
