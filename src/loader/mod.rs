//! Score sheet loading
//!
//! Parses delimited score sheets into snapshots and exposes them through
//! the [`SnapshotSource`] trait.

pub mod source;
pub mod table;

// Re-export commonly used types
pub use source::{
    CacheStats, CachedSnapshotSource, FileSnapshotSource, InMemorySnapshotSource, SnapshotSource,
};
pub use table::{load_table, parse_points, parse_table, TableOptions};
