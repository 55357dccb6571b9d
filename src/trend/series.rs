//! Per-player game series

use crate::error::BoardError;
use crate::types::{GamePoint, PlayerName, PlayerRecord, Snapshot};
use std::collections::BTreeMap;

fn game_points(snapshot: &Snapshot, player: &PlayerRecord) -> Vec<GamePoint> {
    snapshot
        .games()
        .iter()
        .zip(&player.scores)
        .map(|(game, points)| GamePoint {
            game: game.clone(),
            points: *points,
        })
        .collect()
}

/// Raw scores of one player in game order
pub fn player_series(snapshot: &Snapshot, name: &str) -> Result<Vec<GamePoint>, BoardError> {
    let player = snapshot
        .player(name)
        .ok_or_else(|| BoardError::PlayerNotFound {
            name: name.to_string(),
        })?;

    Ok(game_points(snapshot, player))
}

/// Raw scores of every player, keyed by name
pub fn all_series(snapshot: &Snapshot) -> BTreeMap<PlayerName, Vec<GamePoint>> {
    snapshot
        .players()
        .iter()
        .map(|player| (player.name.clone(), game_points(snapshot, player)))
        .collect()
}
