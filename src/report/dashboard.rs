//! Dashboard assembly
//!
//! One request-scoped pass over the score sheets: load, rank, select the
//! trend window and collect per-player series. Blocking failures abort the
//! build; everything else becomes a notice on the report.

use crate::config::AppConfig;
use crate::error::{BoardError, Severity};
use crate::loader::{CachedSnapshotSource, FileSnapshotSource, SnapshotSource};
use crate::ranking;
use crate::trend::{self, TrendWindow, WindowSettings};
use crate::types::{GameLabel, GamePoint, PlayerName, RankedEntry, Snapshot};
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Part of the dashboard a notice belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Leaderboard,
    RankChanges,
    Trend,
    PlayerLookup,
}

/// A non-blocking message shown alongside the rendered sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub section: Section,
    pub severity: Severity,
    pub kind: String,
    pub message: String,
}

impl Notice {
    pub fn from_error(section: Section, error: &BoardError) -> Self {
        Self {
            section,
            severity: error.severity(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// How the title race is shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TrendView {
    /// Cumulative series over the trailing window
    Chart(TrendWindow),
    /// Too few games for a trend; the leading entries are shown instead
    Static { leaders: Vec<RankedEntry> },
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub games: Vec<GameLabel>,
    pub leaderboard: Option<Vec<RankedEntry>>,
    pub trend: Option<TrendView>,
    pub players: BTreeMap<PlayerName, Vec<GamePoint>>,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    snapshot: Option<Snapshot>,
}

impl DashboardReport {
    /// Raw per-game scores for one player of the current snapshot
    pub fn player_series(&self, name: &str) -> Result<Vec<GamePoint>, BoardError> {
        match &self.snapshot {
            Some(snapshot) => trend::player_series(snapshot, name),
            None => self
                .players
                .get(name)
                .cloned()
                .ok_or_else(|| BoardError::PlayerNotFound {
                    name: name.to_string(),
                }),
        }
    }

    pub fn notices_for(&self, section: Section) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.section == section)
    }

    pub fn has_warnings(&self) -> bool {
        !self.notices.is_empty()
    }
}

/// Builds dashboard reports from a current and an optional previous source
#[derive(Clone)]
pub struct Dashboard {
    title: String,
    current: Arc<dyn SnapshotSource>,
    previous: Option<Arc<dyn SnapshotSource>>,
    window: WindowSettings,
}

impl Dashboard {
    pub fn new(
        title: impl Into<String>,
        current: Arc<dyn SnapshotSource>,
        previous: Option<Arc<dyn SnapshotSource>>,
        window: WindowSettings,
    ) -> Self {
        Self {
            title: title.into(),
            current,
            previous,
            window,
        }
    }

    /// Wire file sources according to the configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let source = |path: &std::path::Path| -> Arc<dyn SnapshotSource> {
            let file = FileSnapshotSource::new(path, config.data.blank_as_zero);
            if config.data.cache_snapshots {
                Arc::new(CachedSnapshotSource::new(file))
            } else {
                Arc::new(file)
            }
        };

        Self::new(
            config.dashboard.title.clone(),
            source(config.data.scores_file.as_path()),
            config.data.previous_file.as_deref().map(source),
            config.window_settings(),
        )
    }

    pub fn current_source(&self) -> &Arc<dyn SnapshotSource> {
        &self.current
    }

    pub fn previous_source(&self) -> Option<&Arc<dyn SnapshotSource>> {
        self.previous.as_ref()
    }

    /// Load the previous snapshot, downgrading any failure to a notice.
    /// The previous file is optional, so even a blocking-class error here
    /// only drops rank changes and never fails the render.
    fn load_previous(&self, notices: &mut Vec<Notice>) -> Option<Snapshot> {
        let source = self.previous.as_ref()?;

        let result = source
            .load()
            .and_then(|snapshot| snapshot.ensure_rankable().map(|_| snapshot));

        match result {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    "Previous snapshot from {} unusable, rank changes omitted: {}",
                    source.describe(),
                    e
                );
                notices.push(Notice {
                    section: Section::RankChanges,
                    severity: Severity::Warning,
                    kind: e.kind().to_string(),
                    message: format!("Rank changes unavailable: {}", e),
                });
                None
            }
        }
    }

    /// Build a report. Only blocking failures of the current snapshot are
    /// returned as errors.
    pub fn build(&self) -> Result<DashboardReport, BoardError> {
        let current = self.current.load()?;
        let mut notices = Vec::new();

        let previous = self.load_previous(&mut notices);

        let leaderboard = match ranking::rank_against(&current, previous.as_ref()) {
            Ok(entries) => Some(entries),
            Err(e) if e.severity() == Severity::Blocking => return Err(e),
            Err(e) => {
                warn!("Leaderboard skipped: {}", e);
                notices.push(Notice::from_error(Section::Leaderboard, &e));
                None
            }
        };

        let trend = leaderboard.as_ref().and_then(|entries| {
            match trend::select_window(&current, self.window) {
                Ok(window) => Some(TrendView::Chart(window)),
                Err(e @ BoardError::InsufficientWindow { .. }) => {
                    debug!("Trend replaced by static standings: {}", e);
                    notices.push(Notice::from_error(Section::Trend, &e));
                    Some(TrendView::Static {
                        leaders: entries.iter().take(self.window.top_n).cloned().collect(),
                    })
                }
                Err(e) => {
                    warn!("Trend skipped: {}", e);
                    notices.push(Notice::from_error(Section::Trend, &e));
                    None
                }
            }
        });

        debug!(
            "Built dashboard for {} players over {} games with {} notices",
            current.players().len(),
            current.games().len(),
            notices.len()
        );

        Ok(DashboardReport {
            title: self.title.clone(),
            generated_at: current_timestamp(),
            source: self.current.describe(),
            games: current.games().to_vec(),
            leaderboard,
            trend,
            players: trend::all_series(&current),
            notices,
            snapshot: Some(current),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemorySnapshotSource;
    use crate::types::{PlayerRecord, Points};
    use rust_decimal_macros::dec;
    use std::path::PathBuf;

    fn snapshot(games: usize, players: &[(&str, Vec<Points>)]) -> Snapshot {
        let labels = (1..=games).map(|i| format!("G{}", i)).collect();
        let records = players
            .iter()
            .map(|(name, scores)| PlayerRecord::new(*name, scores.clone()))
            .collect();
        Snapshot::new(labels, records).unwrap()
    }

    fn dashboard(
        current: InMemorySnapshotSource,
        previous: Option<InMemorySnapshotSource>,
    ) -> Dashboard {
        Dashboard::new(
            "Test Board",
            Arc::new(current),
            previous.map(|p| Arc::new(p) as Arc<dyn SnapshotSource>),
            WindowSettings::default(),
        )
    }

    #[test]
    fn test_full_report() {
        let current = snapshot(
            3,
            &[
                ("A", vec![dec!(1), dec!(2), dec!(3)]),
                ("B", vec![dec!(4), dec!(0), dec!(0)]),
            ],
        );
        let previous = snapshot(
            2,
            &[("A", vec![dec!(1), dec!(2)]), ("B", vec![dec!(4), dec!(0)])],
        );

        let report = dashboard(
            InMemorySnapshotSource::new(current),
            Some(InMemorySnapshotSource::new(previous)),
        )
        .build()
        .unwrap();

        let leaderboard = report.leaderboard.as_ref().unwrap();
        assert_eq!(leaderboard[0].name, "A");
        assert_eq!(leaderboard[0].rank_change, Some(1));
        assert!(matches!(report.trend, Some(TrendView::Chart(_))));
        assert_eq!(report.players.len(), 2);
        assert!(!report.has_warnings());
        assert_eq!(report.title, "Test Board");
    }

    #[test]
    fn test_missing_current_file_blocks() {
        let missing = BoardError::FileNotFound {
            path: PathBuf::from("points.csv"),
        };
        let result = dashboard(InMemorySnapshotSource::failing(missing.clone()), None).build();
        assert_eq!(result.unwrap_err(), missing);
    }

    #[test]
    fn test_no_game_data_is_a_warning() {
        let current = snapshot(0, &[("A", vec![])]);

        let report = dashboard(InMemorySnapshotSource::new(current), None)
            .build()
            .unwrap();

        assert!(report.leaderboard.is_none());
        assert!(report.trend.is_none());
        let notice = report.notices_for(Section::Leaderboard).next().unwrap();
        assert_eq!(notice.kind, "no_game_data");
        assert_eq!(notice.severity, Severity::Warning);
    }

    #[test]
    fn test_single_game_uses_static_trend() {
        let current = snapshot(1, &[("A", vec![dec!(3)]), ("B", vec![dec!(5)])]);

        let report = dashboard(InMemorySnapshotSource::new(current), None)
            .build()
            .unwrap();

        match report.trend.as_ref().unwrap() {
            TrendView::Static { leaders } => {
                assert_eq!(leaders.len(), 2);
                assert_eq!(leaders[0].name, "B");
            }
            other => panic!("expected static trend, got {:?}", other),
        }
        assert_eq!(report.notices_for(Section::Trend).count(), 1);
    }

    #[test]
    fn test_broken_previous_only_drops_rank_changes() {
        let current = snapshot(2, &[("A", vec![dec!(3), dec!(1)])]);
        let previous = InMemorySnapshotSource::failing(BoardError::FileNotFound {
            path: PathBuf::from("previous.csv"),
        });

        let report = dashboard(InMemorySnapshotSource::new(current), Some(previous))
            .build()
            .unwrap();

        let leaderboard = report.leaderboard.as_ref().unwrap();
        assert_eq!(leaderboard[0].rank_change, None);
        let notice = report.notices_for(Section::RankChanges).next().unwrap();
        assert_eq!(notice.kind, "file_not_found");
    }

    #[test]
    fn test_player_lookup() {
        let current = snapshot(2, &[("A", vec![dec!(3), dec!(1)])]);
        let report = dashboard(InMemorySnapshotSource::new(current), None)
            .build()
            .unwrap();

        assert_eq!(report.player_series("A").unwrap().len(), 2);
        assert_eq!(
            report.player_series("Z"),
            Err(BoardError::PlayerNotFound {
                name: "Z".to_string()
            })
        );
    }
}
