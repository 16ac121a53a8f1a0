//! Unlock resolution for courses, skins and modes.
use std::collections::BTreeSet;

use crate::catalog::{UnlockKind, Unlockable, UnlockableCatalog};
use crate::evaluator::Evaluator;
use crate::progress::Progress;
use crate::stats::PlayerStatistics;

#[must_use]
pub fn is_unlocked(evaluator: &Evaluator, entry: &Unlockable, stats: &PlayerStatistics) -> bool {
    progress_for(evaluator, entry, stats).is_complete
}

#[must_use]
pub fn progress_for(
    evaluator: &Evaluator,
    entry: &Unlockable,
    stats: &PlayerStatistics,
) -> Progress {
    evaluator.evaluate_entry(entry, stats)
}

/// The locked entry of `kind` that comes next in the unlock sequence.
///
/// Lowest `order` wins; entries sharing an order resolve by declaration order.
#[must_use]
pub fn next_locked<'a>(
    evaluator: &Evaluator,
    catalog: &'a UnlockableCatalog,
    kind: UnlockKind,
    stats: &PlayerStatistics,
) -> Option<&'a Unlockable> {
    // min_by_key returns the first of equal minimums.
    catalog
        .of_kind(kind)
        .filter(|entry| !is_unlocked(evaluator, entry, stats))
        .min_by_key(|entry| entry.order)
}

/// Starter entries, one per kind, in catalog order.
#[must_use]
pub fn default_unlocked(catalog: &UnlockableCatalog) -> Vec<&Unlockable> {
    catalog
        .iter()
        .filter(|entry| entry.requirement.is_default_unlock())
        .collect()
}

/// Ids of every entry `stats` currently satisfies.
#[must_use]
pub fn unlocked_ids(
    evaluator: &Evaluator,
    catalog: &UnlockableCatalog,
    stats: &PlayerStatistics,
) -> BTreeSet<String> {
    catalog
        .iter()
        .filter(|entry| is_unlocked(evaluator, entry, stats))
        .map(|entry| entry.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::Requirement;

    fn entry(id: &str, kind: UnlockKind, order: u32, requirement: Requirement) -> Unlockable {
        Unlockable {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            icon: String::new(),
            kind,
            order,
            value: 0,
            requirement,
        }
    }

    fn catalog() -> UnlockableCatalog {
        UnlockableCatalog::new(vec![
            entry("course_1", UnlockKind::Course, 1, Requirement::None),
            entry(
                "course_3",
                UnlockKind::Course,
                3,
                Requirement::CourseStars {
                    course_id: "course_1".to_string(),
                    stars: 3,
                },
            ),
            entry(
                "course_2",
                UnlockKind::Course,
                2,
                Requirement::CourseCompleted {
                    course_id: "course_1".to_string(),
                },
            ),
            entry("classic", UnlockKind::Skin, 1, Requirement::None),
            entry("gold", UnlockKind::Skin, 5, Requirement::TotalCoins { count: 50 }),
            entry("silver", UnlockKind::Skin, 5, Requirement::TotalCoins { count: 20 }),
            entry("arcade", UnlockKind::Mode, 1, Requirement::None),
        ])
        .unwrap()
    }

    #[test]
    fn star_gated_course_reports_partial_progress() {
        let catalog = catalog();
        let evaluator = Evaluator::for_catalog(&catalog);
        let mut stats = PlayerStatistics::default();
        stats.completed_courses.insert("course_1".to_string());
        stats.course_stars.insert("course_1".to_string(), 2);

        let course_3 = catalog.get("course_3").unwrap();
        assert!(!is_unlocked(&evaluator, course_3, &stats));
        let progress = progress_for(&evaluator, course_3, &stats);
        assert!((progress.current - 2.0).abs() < f64::EPSILON);
        assert!((progress.target - 3.0).abs() < f64::EPSILON);

        stats.course_stars.insert("course_1".to_string(), 3);
        assert!(is_unlocked(&evaluator, course_3, &stats));
    }

    #[test]
    fn next_locked_prefers_order_then_declaration() {
        let catalog = catalog();
        let evaluator = Evaluator::for_catalog(&catalog);
        let stats = PlayerStatistics::default();

        let next = next_locked(&evaluator, &catalog, UnlockKind::Course, &stats).unwrap();
        assert_eq!(next.id, "course_2");

        let next_skin = next_locked(&evaluator, &catalog, UnlockKind::Skin, &stats).unwrap();
        assert_eq!(next_skin.id, "gold");

        assert!(next_locked(&evaluator, &catalog, UnlockKind::Mode, &stats).is_none());
    }

    #[test]
    fn defaults_and_unlocked_ids() {
        let catalog = catalog();
        let evaluator = Evaluator::for_catalog(&catalog);
        let defaults: Vec<&str> = default_unlocked(&catalog)
            .into_iter()
            .map(|entry| entry.id.as_str())
            .collect();
        assert_eq!(defaults, ["course_1", "classic", "arcade"]);

        let stats = PlayerStatistics {
            total_coins_collected: 25,
            ..PlayerStatistics::default()
        };
        let unlocked = unlocked_ids(&evaluator, &catalog, &stats);
        assert!(unlocked.contains("silver"));
        assert!(!unlocked.contains("gold"));
        assert_eq!(unlocked.len(), 4);
    }
}
