//! Leaderboard computation
//!
//! Ranks a snapshot by total points and, when a previous snapshot is
//! available, annotates each entry with its movement since then.

use crate::error::BoardError;
use crate::ranking::policy::{display_order, medal_for_rank, min_ranks, rank_change};
use crate::types::{Points, RankedEntry, Snapshot};
use std::collections::HashMap;
use tracing::debug;

/// Rank a snapshot on its own. Every `rank_change` is `None`.
pub fn rank(snapshot: &Snapshot) -> Result<Vec<RankedEntry>, BoardError> {
    snapshot.ensure_rankable()?;

    let mut standings: Vec<(&str, Points)> = snapshot
        .players()
        .iter()
        .map(|player| (player.name.as_str(), player.total()))
        .collect();
    standings.sort_by(|a, b| display_order(*a, *b));

    let totals: Vec<Points> = standings.iter().map(|(_, total)| *total).collect();
    let ranks = min_ranks(&totals);

    let entries = standings
        .into_iter()
        .zip(ranks)
        .map(|((name, total), rank)| RankedEntry {
            name: name.to_string(),
            total,
            rank,
            rank_change: None,
            medal: medal_for_rank(rank),
        })
        .collect();

    Ok(entries)
}

/// Rank the current snapshot and join rank changes from the previous one.
///
/// The previous snapshot is ranked independently over its own games.
/// Players missing from it get no rank change; players only present in it
/// are not part of the output.
pub fn rank_against(
    current: &Snapshot,
    previous: Option<&Snapshot>,
) -> Result<Vec<RankedEntry>, BoardError> {
    let mut entries = rank(current)?;

    let Some(previous) = previous else {
        return Ok(entries);
    };

    let previous_ranks: HashMap<String, u32> = rank(previous)?
        .into_iter()
        .map(|entry| (entry.name, entry.rank))
        .collect();

    for entry in &mut entries {
        entry.rank_change = rank_change(previous_ranks.get(&entry.name).copied(), entry.rank);
    }

    debug!(
        "Ranked {} players against {} previous standings",
        entries.len(),
        previous_ranks.len()
    );

    Ok(entries)
}
