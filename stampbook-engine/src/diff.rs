//! Incremental detection of newly earned stamps and newly unlocked content.
//!
//! The diff is computed from the current statistics and the set of ids the
//! caller already persisted. Re-running it against its own output yields
//! nothing, so it is safe to call after every session.
use serde::Serialize;
use std::collections::BTreeSet;

use crate::catalog::{
    CatalogEntry, CatalogError, Stamp, StampCatalog, Unlockable, UnlockableCatalog,
};
use crate::constants::LOG_TARGET;
use crate::course::CourseSet;
use crate::evaluator::Evaluator;
use crate::stats::PlayerStatistics;

/// Entries satisfied by `stats` that are not in `previously_earned`, in
/// catalog order.
#[must_use]
pub fn newly_earned<'a, E: CatalogEntry>(
    entries: &'a [E],
    evaluator: &Evaluator,
    stats: &PlayerStatistics,
    previously_earned: &BTreeSet<String>,
) -> Vec<&'a E> {
    entries
        .iter()
        .filter(|entry| !previously_earned.contains(entry.id()))
        .filter(|entry| evaluator.evaluate_entry(*entry, stats).is_complete)
        .collect()
}

/// Outcome of one post-session evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionUpdate {
    pub new_stamps: Vec<String>,
    pub new_unlocks: Vec<String>,
    /// Previously earned stamps plus `new_stamps`.
    pub earned_stamps: BTreeSet<String>,
    /// Previously unlocked ids plus `new_unlocks`.
    pub unlocked: BTreeSet<String>,
}

impl ProgressionUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_stamps.is_empty() && self.new_unlocks.is_empty()
    }
}

/// Both catalogs plus the evaluator that judges them.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    stamps: StampCatalog,
    unlockables: UnlockableCatalog,
    evaluator: Evaluator,
}

impl ProgressionEngine {
    #[must_use]
    pub const fn new(
        stamps: StampCatalog,
        unlockables: UnlockableCatalog,
        evaluator: Evaluator,
    ) -> Self {
        Self {
            stamps,
            unlockables,
            evaluator,
        }
    }

    /// Engine whose "all courses" family counts the course unlockables.
    #[must_use]
    pub fn from_catalogs(stamps: StampCatalog, unlockables: UnlockableCatalog) -> Self {
        let evaluator = Evaluator::for_catalog(&unlockables);
        Self::new(stamps, unlockables, evaluator)
    }

    /// Engine over the bundled data, with cross references checked.
    ///
    /// # Errors
    ///
    /// Returns an error if any bundled file fails to load or a requirement
    /// names a course that is not shipped.
    pub fn bundled() -> Result<Self, CatalogError> {
        let courses = CourseSet::load_from_static()?;
        let stamps = StampCatalog::load_from_static()?;
        let unlockables = UnlockableCatalog::load_from_static()?;
        stamps.check_course_references(&courses)?;
        unlockables.check_course_references(&courses)?;
        Ok(Self::from_catalogs(stamps, unlockables))
    }

    #[must_use]
    pub const fn stamps(&self) -> &StampCatalog {
        &self.stamps
    }

    #[must_use]
    pub const fn unlockables(&self) -> &UnlockableCatalog {
        &self.unlockables
    }

    #[must_use]
    pub const fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    #[must_use]
    pub fn newly_earned_stamps(
        &self,
        stats: &PlayerStatistics,
        previously_earned: &BTreeSet<String>,
    ) -> Vec<&Stamp> {
        newly_earned(self.stamps.entries(), &self.evaluator, stats, previously_earned)
    }

    #[must_use]
    pub fn newly_unlocked(
        &self,
        stats: &PlayerStatistics,
        previously_unlocked: &BTreeSet<String>,
    ) -> Vec<&Unlockable> {
        newly_earned(
            self.unlockables.entries(),
            &self.evaluator,
            stats,
            previously_unlocked,
        )
    }

    /// Diff both catalogs against what the caller already persisted.
    #[must_use]
    pub fn evaluate(
        &self,
        stats: &PlayerStatistics,
        earned_stamps: &BTreeSet<String>,
        unlocked: &BTreeSet<String>,
    ) -> ProgressionUpdate {
        let new_stamps = ids(self.newly_earned_stamps(stats, earned_stamps));
        let new_unlocks = ids(self.newly_unlocked(stats, unlocked));
        log::debug!(
            target: LOG_TARGET,
            "progression diff: {} new stamps, {} new unlocks",
            new_stamps.len(),
            new_unlocks.len()
        );
        ProgressionUpdate {
            earned_stamps: earned_stamps.iter().chain(&new_stamps).cloned().collect(),
            unlocked: unlocked.iter().chain(&new_unlocks).cloned().collect(),
            new_stamps,
            new_unlocks,
        }
    }
}

fn ids<E: CatalogEntry>(entries: Vec<&E>) -> Vec<String> {
    entries.into_iter().map(|entry| entry.id().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Rarity, StampCategory, UnlockKind};
    use crate::requirement::Requirement;

    fn stamp(id: &str, requirement: Requirement) -> Stamp {
        Stamp {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            icon: String::new(),
            category: StampCategory::Collection,
            rarity: Rarity::Common,
            points: 10,
            hidden: false,
            requirement,
        }
    }

    fn unlockable(id: &str, kind: UnlockKind, requirement: Requirement) -> Unlockable {
        Unlockable {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            icon: String::new(),
            kind,
            order: 1,
            value: 0,
            requirement,
        }
    }

    fn engine() -> ProgressionEngine {
        let stamps = StampCatalog::new(vec![
            stamp("banana_lover", Requirement::TotalBananas { count: 100 }),
            stamp("coin_pincher", Requirement::TotalCoins { count: 10 }),
            stamp("banana_hoarder", Requirement::TotalBananas { count: 500 }),
        ])
        .unwrap();
        let unlockables = UnlockableCatalog::new(vec![
            unlockable("course_1", UnlockKind::Course, Requirement::None),
            unlockable("classic", UnlockKind::Skin, Requirement::None),
            unlockable(
                "golden",
                UnlockKind::Skin,
                Requirement::TotalBananas { count: 250 },
            ),
            unlockable("arcade", UnlockKind::Mode, Requirement::None),
        ])
        .unwrap();
        ProgressionEngine::from_catalogs(stamps, unlockables)
    }

    #[test]
    fn newly_earned_keeps_catalog_order() {
        let engine = engine();
        let stats = PlayerStatistics {
            total_bananas_collected: 500,
            ..PlayerStatistics::default()
        };
        let earned: Vec<&str> = engine
            .newly_earned_stamps(&stats, &BTreeSet::new())
            .into_iter()
            .map(|stamp| stamp.id.as_str())
            .collect();
        assert_eq!(earned, ["banana_lover", "banana_hoarder"]);
    }

    #[test]
    fn previously_earned_entries_are_skipped() {
        let engine = engine();
        let stats = PlayerStatistics {
            total_bananas_collected: 500,
            ..PlayerStatistics::default()
        };
        let earned = BTreeSet::from(["banana_lover".to_string()]);
        let new = engine.newly_earned_stamps(&stats, &earned);
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].id, "banana_hoarder");
    }

    #[test]
    fn evaluate_is_idempotent() {
        let engine = engine();
        let stats = PlayerStatistics {
            total_bananas_collected: 300,
            total_coins_collected: 12,
            ..PlayerStatistics::default()
        };
        let first = engine.evaluate(&stats, &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(first.new_stamps, ["banana_lover", "coin_pincher"]);
        assert_eq!(first.new_unlocks, ["course_1", "classic", "golden", "arcade"]);

        let second = engine.evaluate(&stats, &first.earned_stamps, &first.unlocked);
        assert!(second.is_empty());
        assert_eq!(second.earned_stamps, first.earned_stamps);
    }
}
