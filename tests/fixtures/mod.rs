//! Shared fixtures for integration testing: score sheets on disk and
//! ready-made snapshots.

#![allow(dead_code)]

use prediction_board::config::AppConfig;
use prediction_board::loader::InMemorySnapshotSource;
use prediction_board::report::Dashboard;
use prediction_board::service::AppState;
use prediction_board::trend::WindowSettings;
use prediction_board::types::{PlayerRecord, Points, Snapshot};
use prediction_board::SnapshotSource;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Current sheet used across the scenario tests
pub const CURRENT_SHEET: &str = "\
Name,G1,G2,G3,G4,G5,G6
Asha,10,20,5,0,15,20
Ben,5,0,30,10,10,5
Cy,20,10,10,10,5,5
Dev,0,0,0,5,5,5
";

/// Same contest one game earlier
pub const PREVIOUS_SHEET: &str = "\
Name,G1,G2,G3,G4,G5
Asha,10,20,5,0,15
Ben,5,0,30,10,10
Cy,20,10,10,10,5
Dev,0,0,0,5,5
";

/// A directory of score sheets that lives as long as the test
pub struct SheetDir {
    dir: TempDir,
}

impl SheetDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write a sheet and return its path
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write sheet");
        path
    }

    /// Path to a sheet that does not exist
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Configuration pointing at the given sheets
pub fn config_for(current: PathBuf, previous: Option<PathBuf>) -> AppConfig {
    let mut config = AppConfig::default();
    config.dashboard.title = "Test Leaderboard".to_string();
    config.data.scores_file = current;
    config.data.previous_file = previous;
    config
}

/// Build a snapshot of whole-number scores with games labelled G1..Gn
pub fn snapshot(players: &[(&str, &[i64])]) -> Snapshot {
    let games = players.first().map(|(_, s)| s.len()).unwrap_or(0);
    let labels = (1..=games).map(|i| format!("G{}", i)).collect();
    let records = players
        .iter()
        .map(|(name, scores)| {
            PlayerRecord::new(*name, scores.iter().map(|v| Points::from(*v)).collect())
        })
        .collect();
    Snapshot::new(labels, records).expect("valid snapshot")
}

/// App state serving fixed snapshots
pub fn state_with(
    current: InMemorySnapshotSource,
    previous: Option<InMemorySnapshotSource>,
) -> Arc<AppState> {
    let dashboard = Dashboard::new(
        "Test Leaderboard",
        Arc::new(current),
        previous.map(|p| Arc::new(p) as Arc<dyn SnapshotSource>),
        WindowSettings::default(),
    );
    Arc::new(AppState::with_dashboard(AppConfig::default(), dashboard).expect("app state"))
}
