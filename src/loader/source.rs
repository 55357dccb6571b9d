//! Snapshot sources
//!
//! This module defines the interface for obtaining snapshots, with a file
//! backed implementation, an mtime-memoizing wrapper around it and an
//! in-memory implementation for tests and benchmarks.

use crate::error::BoardError;
use crate::loader::table::{load_table, TableOptions};
use crate::types::Snapshot;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Trait for loading a snapshot on demand
pub trait SnapshotSource: Send + Sync {
    /// Load the snapshot as it currently is
    fn load(&self) -> Result<Snapshot, BoardError>;

    /// Human readable origin, used in logs and health output
    fn describe(&self) -> String;

    /// Cache statistics, for sources that memoize
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

/// Reads a score sheet from disk on every load
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
    options: TableOptions,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>, blank_as_zero: bool) -> Self {
        let path = path.into();
        let options = TableOptions::for_path(&path, blank_as_zero);
        Self { path, options }
    }

    /// Modification time of the underlying file
    pub fn modified(&self) -> Result<SystemTime, BoardError> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => BoardError::FileNotFound {
                    path: self.path.clone(),
                },
                _ => BoardError::MalformedTable {
                    message: format!("{}: {}", self.path.display(), e),
                },
            })
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn load(&self) -> Result<Snapshot, BoardError> {
        load_table(&self.path, &self.options)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug)]
struct CachedEntry {
    modified: SystemTime,
    snapshot: Snapshot,
}

/// Cache statistics for a memoizing source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// File source that reuses the last parse while the file's modification
/// time is unchanged. Only successful parses are kept.
#[derive(Debug)]
pub struct CachedSnapshotSource {
    inner: FileSnapshotSource,
    cache: RwLock<Option<CachedEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedSnapshotSource {
    pub fn new(inner: FileSnapshotSource) -> Self {
        Self {
            inner,
            cache: RwLock::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn cached(&self, modified: SystemTime) -> Option<Snapshot> {
        let cache = match self.cache.read() {
            Ok(cache) => cache,
            Err(_) => {
                warn!("Snapshot cache lock poisoned, reading from disk");
                return None;
            }
        };

        cache
            .as_ref()
            .filter(|entry| entry.modified == modified)
            .map(|entry| entry.snapshot.clone())
    }

    fn store(&self, entry: Option<CachedEntry>) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = entry;
        }
    }
}

impl SnapshotSource for CachedSnapshotSource {
    fn load(&self) -> Result<Snapshot, BoardError> {
        let modified = match self.inner.modified() {
            Ok(modified) => modified,
            Err(e) => {
                self.store(None);
                return Err(e);
            }
        };

        if let Some(snapshot) = self.cached(modified) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Snapshot cache hit for {}", self.inner.describe());
            return Ok(snapshot);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Snapshot cache miss for {}", self.inner.describe());

        match self.inner.load() {
            Ok(snapshot) => {
                self.store(Some(CachedEntry {
                    modified,
                    snapshot: snapshot.clone(),
                }));
                Ok(snapshot)
            }
            Err(e) => {
                self.store(None);
                Err(e)
            }
        }
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.stats())
    }
}

/// Source serving a fixed snapshot or a fixed failure
#[derive(Debug, Clone)]
pub struct InMemorySnapshotSource {
    result: Result<Snapshot, BoardError>,
}

impl InMemorySnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            result: Ok(snapshot),
        }
    }

    pub fn failing(error: BoardError) -> Self {
        Self { result: Err(error) }
    }
}

impl SnapshotSource for InMemorySnapshotSource {
    fn load(&self) -> Result<Snapshot, BoardError> {
        self.result.clone()
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
