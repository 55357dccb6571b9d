//! Utility functions for the prediction board

use crate::types::Points;
use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Format points without trailing zeros, so whole numbers have no fraction
pub fn format_points(points: Points) -> String {
    points.normalize().to_string()
}

/// Arrow marker for a rank change; empty when there is nothing to compare
pub fn format_rank_change(change: Option<i64>) -> String {
    match change {
        Some(delta) if delta > 0 => format!("▲{}", delta),
        Some(delta) if delta < 0 => format!("▼{}", -delta),
        Some(_) => "–".to_string(),
        None => String::new(),
    }
}
