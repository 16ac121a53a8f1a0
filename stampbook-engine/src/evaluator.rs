//! Requirement evaluation.
//!
//! `Evaluator::evaluate` is a pure function of a requirement and a statistics
//! snapshot. It never fails: anything it cannot resolve is reported as not
//! complete, and missing per-course entries fall back to values that fail
//! their condition.
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, UnlockKind, UnlockableCatalog};
use crate::constants::{LOG_TARGET, MAX_STARS, MS_PER_HOUR};
use crate::course::CourseSet;
use crate::predicates::PredicateRegistry;
use crate::progress::Progress;
use crate::requirement::Requirement;
use crate::stats::PlayerStatistics;

/// Course count shipped in the bundled course data.
pub const DEFAULT_TOTAL_COURSES: u32 = 6;

/// Settings for the "all courses" requirement family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatorConfig {
    #[serde(default = "EvaluatorConfig::default_total_courses")]
    pub total_courses: u32,
    /// When set, only these courses count toward "all courses" requirements
    /// and the target is their number instead of `total_courses`.
    #[serde(default)]
    pub course_ids: Vec<String>,
}

impl EvaluatorConfig {
    const fn default_total_courses() -> u32 {
        DEFAULT_TOTAL_COURSES
    }

    #[must_use]
    pub fn for_course_ids(course_ids: Vec<String>) -> Self {
        Self {
            total_courses: u32::try_from(course_ids.len()).unwrap_or(u32::MAX),
            course_ids,
        }
    }

    fn course_target(&self) -> u64 {
        if self.course_ids.is_empty() {
            u64::from(self.total_courses)
        } else {
            self.course_ids.len() as u64
        }
    }

    fn counts_course(&self, course_id: &str) -> bool {
        self.course_ids.is_empty() || self.course_ids.iter().any(|id| id == course_id)
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            total_courses: Self::default_total_courses(),
            course_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
    predicates: PredicateRegistry,
}

impl Evaluator {
    #[must_use]
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            predicates: PredicateRegistry::new(),
        }
    }

    /// Evaluator whose "all courses" family counts exactly the given courses.
    #[must_use]
    pub fn for_courses(courses: &CourseSet) -> Self {
        let ids = courses.iter().map(|course| course.id.clone()).collect();
        Self::new(EvaluatorConfig::for_course_ids(ids))
    }

    /// Evaluator whose "all courses" family counts the course unlockables.
    #[must_use]
    pub fn for_catalog(catalog: &UnlockableCatalog) -> Self {
        let ids = catalog
            .of_kind(UnlockKind::Course)
            .map(|entry| entry.id.clone())
            .collect();
        Self::new(EvaluatorConfig::for_course_ids(ids))
    }

    #[must_use]
    pub fn with_predicates(mut self, predicates: PredicateRegistry) -> Self {
        self.predicates = predicates;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    #[must_use]
    pub const fn predicates(&self) -> &PredicateRegistry {
        &self.predicates
    }

    /// Progress of `entry`'s requirement.
    #[must_use]
    pub fn evaluate_entry<E: CatalogEntry + ?Sized>(
        &self,
        entry: &E,
        stats: &PlayerStatistics,
    ) -> Progress {
        self.evaluate(entry.requirement(), stats)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate(&self, requirement: &Requirement, stats: &PlayerStatistics) -> Progress {
        match requirement {
            Requirement::None => Progress::complete(),
            Requirement::TotalBananas { count } => {
                Progress::counted(stats.total_bananas_collected, *count)
            }
            Requirement::TotalCoins { count } => {
                Progress::counted(stats.total_coins_collected, *count)
            }
            Requirement::TotalCrashes { count } => Progress::counted(stats.total_crashes, *count),
            Requirement::PlayTimeHours { hours } => {
                let played = stats.total_play_time_ms as f64 / MS_PER_HOUR;
                Progress::toward(played, *hours)
            }
            Requirement::StampsEarned { count } => {
                Progress::counted(stats.earned_stamps.len() as u64, *count)
            }
            Requirement::LongestAirTime { seconds } => {
                Progress::toward(stats.longest_air_time_seconds, *seconds)
            }
            Requirement::NarrowEscape { margin } => {
                Progress::flag(stats.narrowest_escape.is_some_and(|m| m <= *margin))
            }
            Requirement::CourseCompleted { course_id } => {
                Progress::flag(stats.has_completed(course_id))
            }
            Requirement::CoursePerfected { course_id } => {
                Progress::flag(stats.has_perfected(course_id))
            }
            // Reports recorded stars against the required count so that
            // "2 of 3 stars" can be shown.
            Requirement::CourseStars { course_id, stars } => Progress::counted(
                u64::from(stats.stars_or_zero(course_id)),
                u64::from(*stars),
            ),
            Requirement::SpeedRun {
                course_id,
                max_seconds,
            } => Progress::flag(stats.best_time_or_slowest(course_id) <= *max_seconds),
            Requirement::CourseScore { course_id, score } => {
                Progress::flag(stats.best_score_or_zero(course_id) >= *score)
            }
            Requirement::MechanismUsed { course_id } => {
                Progress::flag(stats.used_mechanism_on(course_id))
            }
            Requirement::SkipCollectibles {
                course_id,
                min_skipped,
            } => Progress::flag(
                stats
                    .course_bananas
                    .get(course_id)
                    .is_some_and(|tally| tally.most_skipped() >= *min_skipped),
            ),
            Requirement::AllCoursesCompleted => {
                self.all_courses(stats.completed_courses.iter().map(String::as_str))
            }
            Requirement::AllCoursesPerfected => {
                self.all_courses(stats.perfected_courses.iter().map(String::as_str))
            }
            Requirement::AllCoursesThreeStars => self.all_courses(
                stats
                    .course_stars
                    .iter()
                    .filter(|(_, stars)| **stars >= MAX_STARS)
                    .map(|(id, _)| id.as_str()),
            ),
            Requirement::Named { key } => self.predicates.resolve(key, stats).unwrap_or_else(|| {
                log::debug!(
                    target: LOG_TARGET,
                    "no predicate registered for named requirement '{key}'"
                );
                Progress::unresolved()
            }),
        }
    }

    fn all_courses<'a>(&self, qualifying: impl Iterator<Item = &'a str>) -> Progress {
        let target = self.config.course_target();
        let count = qualifying
            .filter(|id| self.config.counts_course(id))
            .count() as u64;
        Progress::counted(count.min(target), target)
    }
}
