//! Common types used throughout the prediction board

use crate::error::BoardError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unique identifier for a contest player
pub type PlayerName = String;

/// Label of a game column, e.g. "Match 12"
pub type GameLabel = String;

/// Points scored in a game. Decimal so that equal totals compare equal
/// whatever order the games are summed in.
pub type Points = Decimal;

/// One row of a score sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: PlayerName,
    /// One entry per game, in game order
    pub scores: Vec<Points>,
}

impl PlayerRecord {
    pub fn new(name: impl Into<PlayerName>, scores: Vec<Points>) -> Self {
        Self {
            name: name.into(),
            scores,
        }
    }

    /// Sum of all scores
    pub fn total(&self) -> Points {
        self.scores.iter().sum()
    }
}

/// All player records of a score sheet at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    games: Vec<GameLabel>,
    players: Vec<PlayerRecord>,
}

impl Snapshot {
    /// Build a snapshot, checking that names are unique and that every
    /// record has one score per game.
    pub fn new(games: Vec<GameLabel>, players: Vec<PlayerRecord>) -> Result<Self, BoardError> {
        let mut seen = HashSet::with_capacity(players.len());
        for player in &players {
            if !seen.insert(player.name.as_str()) {
                return Err(BoardError::DuplicatePlayer {
                    name: player.name.clone(),
                });
            }
            if player.scores.len() != games.len() {
                return Err(BoardError::ScoreCountMismatch {
                    name: player.name.clone(),
                    expected: games.len(),
                    actual: player.scores.len(),
                });
            }
        }

        Ok(Self { games, players })
    }

    pub fn games(&self) -> &[GameLabel] {
        &self.games
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Fails if the snapshot cannot be ranked at all
    pub fn ensure_rankable(&self) -> Result<(), BoardError> {
        if self.players.is_empty() {
            return Err(BoardError::EmptySnapshot);
        }
        if self.games.is_empty() {
            return Err(BoardError::NoGameData);
        }
        Ok(())
    }
}

/// Display label for the top three ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn emoji(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

impl std::fmt::Display for Medal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Medal::Gold => write!(f, "gold"),
            Medal::Silver => write!(f, "silver"),
            Medal::Bronze => write!(f, "bronze"),
        }
    }
}

/// A leaderboard row derived from a player record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: PlayerName,
    pub total: Points,
    /// 1-based, tied totals share the best rank
    pub rank: u32,
    /// Previous rank minus current rank, positive means moved up
    pub rank_change: Option<i64>,
    pub medal: Option<Medal>,
}

/// A single game's score for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePoint {
    pub game: GameLabel,
    pub points: Points,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_player_total() {
        let record = PlayerRecord::new("Asha", vec![dec!(10), dec!(20), dec!(5)]);
        assert_eq!(record.total(), dec!(35));

        let empty = PlayerRecord::new("Ben", vec![]);
        assert_eq!(empty.total(), Decimal::ZERO);
    }

    #[test]
    fn test_total_is_exact_for_decimal_scores() {
        let asha = PlayerRecord::new("Asha", vec![dec!(0.1), dec!(0.2), dec!(0.3)]);
        let ben = PlayerRecord::new("Ben", vec![dec!(0.3), dec!(0.2), dec!(0.1)]);
        assert_eq!(asha.total(), ben.total());
        assert_eq!(asha.total(), dec!(0.6));
    }

    #[test]
    fn test_snapshot_rejects_duplicate_names() {
        let result = Snapshot::new(
            vec!["G1".to_string()],
            vec![
                PlayerRecord::new("Asha", vec![dec!(1)]),
                PlayerRecord::new("Asha", vec![dec!(2)]),
            ],
        );
        assert_eq!(
            result,
            Err(BoardError::DuplicatePlayer {
                name: "Asha".to_string()
            })
        );
    }

    #[test]
    fn test_snapshot_rejects_misaligned_scores() {
        let result = Snapshot::new(
            vec!["G1".to_string(), "G2".to_string()],
            vec![PlayerRecord::new("Asha", vec![dec!(1)])],
        );
        assert!(matches!(
            result,
            Err(BoardError::ScoreCountMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_ensure_rankable() {
        let empty = Snapshot::new(vec!["G1".to_string()], vec![]).unwrap();
        assert_eq!(empty.ensure_rankable(), Err(BoardError::EmptySnapshot));

        let no_games = Snapshot::new(vec![], vec![PlayerRecord::new("Asha", vec![])]).unwrap();
        assert_eq!(no_games.ensure_rankable(), Err(BoardError::NoGameData));

        let both = Snapshot::new(vec![], vec![]).unwrap();
        assert_eq!(both.ensure_rankable(), Err(BoardError::EmptySnapshot));
    }

    #[test]
    fn test_medal_labels() {
        assert_eq!(Medal::Gold.to_string(), "gold");
        assert_eq!(Medal::Bronze.emoji(), "🥉");
    }
}
