//! Dashboard reports
//!
//! Assembles the leaderboard, trend and per-player views for one render and
//! classifies failures into blocking errors and notices.

pub mod dashboard;
pub mod text;

// Re-export commonly used types
pub use dashboard::{Dashboard, DashboardReport, Notice, Section, TrendView};
pub use text::render_text;
