//! Trend views over a snapshot
//!
//! The recent-performance window used for the title race and the raw
//! per-game series used for single player lookups.

pub mod series;
pub mod window;

// Re-export commonly used types
pub use series::{all_series, player_series};
pub use window::{select_window, CumulativeSeries, TrendWindow, WindowSettings};
