//! Ranking policy primitives
//!
//! Ordering, tie handling, the rank change sign convention and medals are
//! kept as separate pure functions so each can be checked on its own.

use crate::types::{Medal, Points};
use std::cmp::Ordering;

/// Display order: total descending, then name ascending
pub fn display_order(a: (&str, Points), b: (&str, Points)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Assign min-method ranks to totals that are already sorted descending.
///
/// Each rank is one more than the number of strictly greater totals, so
/// tied totals share a rank and the following rank skips.
pub fn min_ranks(sorted_totals: &[Points]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_totals.len());
    let mut current_rank = 0u32;

    for (index, total) in sorted_totals.iter().enumerate() {
        let tied_with_previous = index > 0 && sorted_totals[index - 1] == *total;
        if !tied_with_previous {
            current_rank = index as u32 + 1;
        }
        ranks.push(current_rank);
    }

    ranks
}

/// Previous rank minus current rank; `None` when there is no previous rank
pub fn rank_change(previous_rank: Option<u32>, current_rank: u32) -> Option<i64> {
    previous_rank.map(|previous| previous as i64 - current_rank as i64)
}

/// Medal for a rank. Every player sharing rank 1 gets gold.
pub fn medal_for_rank(rank: u32) -> Option<Medal> {
    match rank {
        1 => Some(Medal::Gold),
        2 => Some(Medal::Silver),
        3 => Some(Medal::Bronze),
        _ => None,
    }
}
