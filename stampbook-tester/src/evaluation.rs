use serde::Serialize;
use std::collections::BTreeSet;

use stampbook_engine::{
    CatalogEntry, PlayerStatistics, Progress, ProgressionEngine, UnlockKind, next_goals,
    next_locked,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryProgress {
    pub id: String,
    pub name: String,
    pub progress: Progress,
}

impl EntryProgress {
    fn of<E: CatalogEntry>(entry: &E, progress: Progress) -> Self {
        Self {
            id: entry.id().to_string(),
            name: entry.name().to_string(),
            progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextUnlock {
    pub kind: UnlockKind,
    pub entry: EntryProgress,
}

/// Where one statistics snapshot stands against the catalogs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub new_stamps: Vec<String>,
    pub new_unlocks: Vec<String>,
    pub earned_count: usize,
    pub stamp_count: usize,
    pub next_unlocks: Vec<NextUnlock>,
    pub goals: Vec<EntryProgress>,
}

pub fn evaluate_player(
    engine: &ProgressionEngine,
    stats: &PlayerStatistics,
    earned: &BTreeSet<String>,
    unlocked: &BTreeSet<String>,
    goal_limit: usize,
) -> Evaluation {
    let update = engine.evaluate(stats, earned, unlocked);
    let evaluator = engine.evaluator();

    let next_unlocks = UnlockKind::ALL
        .into_iter()
        .filter_map(|kind| {
            next_locked(evaluator, engine.unlockables(), kind, stats).map(|entry| NextUnlock {
                kind,
                entry: EntryProgress::of(entry, evaluator.evaluate_entry(entry, stats)),
            })
        })
        .collect();

    let goals = next_goals(
        engine.stamps(),
        evaluator,
        stats,
        &update.earned_stamps,
        goal_limit,
    )
    .into_iter()
    .map(|goal| EntryProgress::of(goal.stamp, goal.progress))
    .collect();

    Evaluation {
        earned_count: update.earned_stamps.len(),
        stamp_count: engine.stamps().len(),
        new_stamps: update.new_stamps,
        new_unlocks: update.new_unlocks,
        next_unlocks,
        goals,
    }
}
