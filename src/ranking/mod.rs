//! Ranking engine for contest snapshots
//!
//! Totals, min-method ranks, rank changes against a previous snapshot and
//! the medal policy.

pub mod engine;
pub mod policy;

// Re-export commonly used functions
pub use engine::{rank, rank_against};
pub use policy::{display_order, medal_for_rank, min_ranks, rank_change};
