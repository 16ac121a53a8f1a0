//! Presentation helpers for the stamp book.
//!
//! Hidden stamps and rarity only matter here; evaluation treats every
//! stamp alike.
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::catalog::{Stamp, StampCatalog};
use crate::evaluator::Evaluator;
use crate::progress::Progress;
use crate::stats::PlayerStatistics;

/// A stamp paired with the player's progress toward it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal<'a> {
    pub stamp: &'a Stamp,
    pub progress: Progress,
}

/// Stamps worth showing as "up next".
///
/// Earned stamps and hidden stamps are left out. The rest sort by percent
/// complete (highest first), then rarity (rarest first), then catalog order,
/// and at most `limit` are returned.
#[must_use]
pub fn next_goals<'a>(
    catalog: &'a StampCatalog,
    evaluator: &Evaluator,
    stats: &PlayerStatistics,
    earned: &BTreeSet<String>,
    limit: usize,
) -> Vec<Goal<'a>> {
    let mut goals: Vec<(usize, Goal<'a>)> = catalog
        .iter()
        .enumerate()
        .filter(|(_, stamp)| !stamp.hidden && !earned.contains(&stamp.id))
        .map(|(position, stamp)| {
            let progress = evaluator.evaluate_entry(stamp, stats);
            (position, Goal { stamp, progress })
        })
        .filter(|(_, goal)| !goal.progress.is_complete)
        .collect();

    goals.sort_by(|(pos_a, a), (pos_b, b)| {
        b.progress
            .percent_complete
            .partial_cmp(&a.progress.percent_complete)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.stamp.rarity.rank().cmp(&a.stamp.rarity.rank()))
            .then_with(|| pos_a.cmp(pos_b))
    });
    goals.truncate(limit);
    goals.into_iter().map(|(_, goal)| goal).collect()
}

/// Stamps a stamp book lists: everything not hidden, plus hidden stamps the
/// player has already earned.
pub fn visible_stamps<'a>(
    catalog: &'a StampCatalog,
    earned: &'a BTreeSet<String>,
) -> impl Iterator<Item = &'a Stamp> {
    catalog
        .iter()
        .filter(move |stamp| !stamp.hidden || earned.contains(&stamp.id))
}
