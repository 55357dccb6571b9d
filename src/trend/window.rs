//! Recent-performance window selection
//!
//! Picks the trailing games of a snapshot and builds fresh cumulative
//! series over them for the leading players.

use crate::error::BoardError;
use crate::ranking;
use crate::types::{GameLabel, PlayerName, Points, Snapshot};
use serde::{Deserialize, Serialize};

/// Default number of trailing games in the window
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Default number of leading players shown in the trend
pub const DEFAULT_TOP_N: usize = 7;

/// Fewest games a trend can be drawn over
pub const MIN_TREND_GAMES: usize = 2;

/// Cumulative points of one player across the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSeries {
    pub name: PlayerName,
    /// One value per windowed game, starting from that game's score
    pub points: Vec<Points>,
}

/// Trailing games and the leading players' series across them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendWindow {
    pub games: Vec<GameLabel>,
    /// In leaderboard order
    pub series: Vec<CumulativeSeries>,
}

impl TrendWindow {
    pub fn series_for(&self, name: &str) -> Option<&CumulativeSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Window selection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSettings {
    pub window_size: usize,
    pub top_n: usize,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Range of trailing game indices covered by a window of `window_size`
pub fn trailing_range(game_count: usize, window_size: usize) -> std::ops::Range<usize> {
    let effective = window_size.min(game_count);
    (game_count - effective)..game_count
}

/// Running sum that starts from zero at the first value
pub fn cumulative(values: &[Points]) -> Vec<Points> {
    values
        .iter()
        .scan(Points::ZERO, |running, value| {
            *running += value;
            Some(*running)
        })
        .collect()
}

/// Select the trend window for the top players of a snapshot.
///
/// Players are chosen by overall total in leaderboard order and exactly
/// `top_n` are included even when ranks tie at the boundary.
pub fn select_window(
    snapshot: &Snapshot,
    settings: WindowSettings,
) -> Result<TrendWindow, BoardError> {
    let leaders = ranking::rank(snapshot)?;

    let range = trailing_range(snapshot.games().len(), settings.window_size);
    if range.len() < MIN_TREND_GAMES {
        return Err(BoardError::InsufficientWindow {
            available: range.len(),
            required: MIN_TREND_GAMES,
        });
    }

    let games = snapshot.games()[range.clone()].to_vec();
    let series = leaders
        .iter()
        .take(settings.top_n)
        .filter_map(|entry| snapshot.player(&entry.name))
        .map(|player| CumulativeSeries {
            name: player.name.clone(),
            points: cumulative(&player.scores[range.clone()]),
        })
        .collect();

    Ok(TrendWindow { games, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerRecord;
    use rust_decimal_macros::dec;

    fn snapshot(games: usize, players: &[(&str, Vec<Points>)]) -> Snapshot {
        let labels = (1..=games).map(|i| format!("G{}", i)).collect();
        let records = players
            .iter()
            .map(|(name, scores)| PlayerRecord::new(*name, scores.clone()))
            .collect();
        Snapshot::new(labels, records).unwrap()
    }

    #[test]
    fn test_trailing_range() {
        assert_eq!(trailing_range(10, 5), 5..10);
        assert_eq!(trailing_range(3, 5), 0..3);
        assert_eq!(trailing_range(0, 5), 0..0);
        assert_eq!(trailing_range(4, 0), 4..4);
    }

    #[test]
    fn test_cumulative() {
        assert_eq!(
            cumulative(&[dec!(3), dec!(0), dec!(2)]),
            vec![dec!(3), dec!(3), dec!(5)]
        );
        assert!(cumulative(&[]).is_empty());
    }

    #[test]
    fn test_window_restarts_cumulative_sum() {
        let snap = snapshot(
            7,
            &[(
                "A",
                vec![dec!(100), dec!(100), dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)],
            )],
        );

        let window = select_window(&snap, WindowSettings::default()).unwrap();

        assert_eq!(window.games, vec!["G3", "G4", "G5", "G6", "G7"]);
        let a = window.series_for("A").unwrap();
        assert_eq!(a.points, vec![dec!(1), dec!(3), dec!(6), dec!(10), dec!(15)]);
    }

    #[test]
    fn test_window_shorter_than_requested() {
        let snap = snapshot(3, &[("A", vec![dec!(1), dec!(2), dec!(3)])]);

        let window = select_window(&snap, WindowSettings::default()).unwrap();

        assert_eq!(window.games.len(), 3);
        assert_eq!(window.series[0].points, vec![dec!(1), dec!(3), dec!(6)]);
    }

    #[test]
    fn test_insufficient_window() {
        let snap = snapshot(1, &[("A", vec![dec!(4)])]);
        assert_eq!(
            select_window(&snap, WindowSettings::default()),
            Err(BoardError::InsufficientWindow {
                available: 1,
                required: 2
            })
        );
    }

    #[test]
    fn test_top_n_breaks_boundary_ties_by_name() {
        let snap = snapshot(
            2,
            &[
                ("Dev", vec![dec!(1), dec!(1)]),
                ("Cam", vec![dec!(1), dec!(1)]),
                ("Ali", vec![dec!(5), dec!(5)]),
                ("Bea", vec![dec!(1), dec!(1)]),
            ],
        );
        let settings = WindowSettings {
            window_size: 5,
            top_n: 3,
        };

        let window = select_window(&snap, settings).unwrap();

        let names: Vec<_> = window.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ali", "Bea", "Cam"]);
    }

    #[test]
    fn test_top_n_selected_on_overall_total() {
        // B leads overall but A leads inside the window
        let snap = snapshot(
            3,
            &[
                ("A", vec![dec!(0), dec!(5), dec!(5)]),
                ("B", vec![dec!(20), dec!(0), dec!(0)]),
            ],
        );
        let settings = WindowSettings {
            window_size: 2,
            top_n: 1,
        };

        let window = select_window(&snap, settings).unwrap();

        assert_eq!(window.series.len(), 1);
        assert_eq!(window.series[0].name, "B");
        assert_eq!(window.series[0].points, vec![dec!(0), dec!(0)]);
    }

    #[test]
    fn test_window_propagates_snapshot_errors() {
        let snap = snapshot(0, &[("A", vec![])]);
        assert_eq!(
            select_window(&snap, WindowSettings::default()),
            Err(BoardError::NoGameData)
        );
    }
}
