//! Cumulative player statistics.
//!
//! `PlayerStatistics` is the snapshot every requirement is evaluated against.
//! The gameplay layer owns it; the only mutation this crate offers is
//! [`PlayerStatistics::record_session`], which folds a finished run in without
//! ever lowering a counter or a personal best.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::course::CourseDefinition;
use crate::stars::{StarRating, rate};

/// Per-course collectible tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BananaTally {
    /// Most bananas picked up in a single completed run.
    pub best_collected: u32,
    /// Fewest bananas picked up in a single completed run.
    pub fewest_collected: u32,
    /// Bananas placed on the course.
    pub total: u32,
}

impl BananaTally {
    /// Bananas left behind on the sparsest completed run.
    #[must_use]
    pub const fn most_skipped(&self) -> u32 {
        self.total.saturating_sub(self.fewest_collected)
    }
}

/// Lifetime statistics for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStatistics {
    pub total_bananas_collected: u64,
    pub total_coins_collected: u64,
    pub total_crashes: u64,
    pub total_play_time_ms: u64,
    pub longest_air_time_seconds: f64,
    /// Smallest recorded margin on a near miss. Lower is a closer call.
    pub narrowest_escape: Option<f64>,

    pub course_best_times: BTreeMap<String, f64>,
    pub course_best_scores: BTreeMap<String, u64>,
    pub course_stars: BTreeMap<String, u8>,
    pub course_bananas: BTreeMap<String, BananaTally>,
    pub courses_with_mechanisms: BTreeSet<String>,

    pub completed_courses: BTreeSet<String>,
    pub perfected_courses: BTreeSet<String>,
    pub earned_stamps: BTreeSet<String>,
}

/// Scoring inputs from one finished (or abandoned) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionReport {
    pub course_id: String,
    pub completed: bool,
    pub finish_time_seconds: f64,
    pub score: u64,
    pub bananas_collected: u32,
    pub coins_collected: u64,
    pub deaths: u32,
    pub play_time_ms: u64,
    pub longest_air_time_seconds: f64,
    pub narrowest_escape: Option<f64>,
    pub used_mechanism: bool,
}

impl PlayerStatistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load statistics from a JSON snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a statistics snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Best time for a course, or infinitely slow when never finished.
    #[must_use]
    pub fn best_time_or_slowest(&self, course_id: &str) -> f64 {
        self.course_best_times
            .get(course_id)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    #[must_use]
    pub fn stars_or_zero(&self, course_id: &str) -> u8 {
        self.course_stars.get(course_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn best_score_or_zero(&self, course_id: &str) -> u64 {
        self.course_best_scores.get(course_id).copied().unwrap_or(0)
    }

    /// Tally for a course, or an empty tally when the course was never finished.
    #[must_use]
    pub fn bananas_or_empty(&self, course_id: &str) -> BananaTally {
        self.course_bananas
            .get(course_id)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_completed(&self, course_id: &str) -> bool {
        self.completed_courses.contains(course_id)
    }

    #[must_use]
    pub fn has_perfected(&self, course_id: &str) -> bool {
        self.perfected_courses.contains(course_id)
    }

    #[must_use]
    pub fn used_mechanism_on(&self, course_id: &str) -> bool {
        self.courses_with_mechanisms.contains(course_id)
    }

    /// Fold a finished run into the aggregate.
    ///
    /// Counters only grow and personal bests only improve. Returns the star
    /// rating when the run completed the course.
    pub fn record_session(
        &mut self,
        course: &CourseDefinition,
        report: &SessionReport,
    ) -> Option<StarRating> {
        self.total_bananas_collected = self
            .total_bananas_collected
            .saturating_add(u64::from(report.bananas_collected));
        self.total_coins_collected = self
            .total_coins_collected
            .saturating_add(report.coins_collected);
        self.total_crashes = self
            .total_crashes
            .saturating_add(u64::from(report.deaths));
        self.total_play_time_ms = self.total_play_time_ms.saturating_add(report.play_time_ms);
        if report.longest_air_time_seconds > self.longest_air_time_seconds {
            self.longest_air_time_seconds = report.longest_air_time_seconds;
        }
        if let Some(margin) = report.narrowest_escape.filter(|m| m.is_finite()) {
            self.narrowest_escape = Some(self.narrowest_escape.map_or(margin, |m| m.min(margin)));
        }
        if report.used_mechanism {
            self.courses_with_mechanisms.insert(course.id.clone());
        }

        if !report.completed {
            return None;
        }

        let course_id = course.id.clone();
        self.completed_courses.insert(course_id.clone());
        if report.deaths == 0 {
            self.perfected_courses.insert(course_id.clone());
        }

        if report.finish_time_seconds.is_finite()
            && report.finish_time_seconds < self.best_time_or_slowest(&course_id)
        {
            self.course_best_times
                .insert(course_id.clone(), report.finish_time_seconds);
        }

        let best_score = self.course_best_scores.entry(course_id.clone()).or_insert(0);
        *best_score = (*best_score).max(report.score);

        let fraction = collectible_fraction(report.bananas_collected, course.total_bananas);
        let rating = rate(course, report.finish_time_seconds, fraction, report.deaths);
        let stars = self.course_stars.entry(course_id.clone()).or_insert(0);
        *stars = (*stars).max(rating.count());

        let collected = report.bananas_collected.min(course.total_bananas);
        self.course_bananas
            .entry(course_id)
            .and_modify(|tally| {
                tally.best_collected = tally.best_collected.max(collected);
                tally.fewest_collected = tally.fewest_collected.min(collected);
                tally.total = course.total_bananas;
            })
            .or_insert(BananaTally {
                best_collected: collected,
                fewest_collected: collected,
                total: course.total_bananas,
            });

        Some(rating)
    }

    /// Whether `self` is at least as far along as `other` on every field.
    ///
    /// Statistics produced by [`Self::record_session`] from `other` always
    /// dominate `other`.
    #[must_use]
    pub fn dominates(&self, other: &Self) -> bool {
        let counters = self.total_bananas_collected >= other.total_bananas_collected
            && self.total_coins_collected >= other.total_coins_collected
            && self.total_crashes >= other.total_crashes
            && self.total_play_time_ms >= other.total_play_time_ms
            && self.longest_air_time_seconds >= other.longest_air_time_seconds;
        let escape = match (self.narrowest_escape, other.narrowest_escape) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(mine), Some(theirs)) => mine <= theirs,
        };
        let times = other
            .course_best_times
            .iter()
            .all(|(id, time)| self.best_time_or_slowest(id) <= *time);
        let scores = other
            .course_best_scores
            .iter()
            .all(|(id, score)| self.best_score_or_zero(id) >= *score);
        let stars = other
            .course_stars
            .iter()
            .all(|(id, stars)| self.stars_or_zero(id) >= *stars);
        let bananas = other.course_bananas.iter().all(|(id, theirs)| {
            self.course_bananas.get(id).is_some_and(|mine| {
                mine.best_collected >= theirs.best_collected
                    && mine.most_skipped() >= theirs.most_skipped()
            })
        });
        let sets = self
            .courses_with_mechanisms
            .is_superset(&other.courses_with_mechanisms)
            && self.completed_courses.is_superset(&other.completed_courses)
            && self.perfected_courses.is_superset(&other.perfected_courses)
            && self.earned_stamps.is_superset(&other.earned_stamps);

        counters && escape && times && scores && stars && bananas && sets
    }
}

/// Fraction of a course's bananas collected, clamped to `[0, 1]`.
///
/// A course without bananas counts as fully collected.
#[must_use]
pub fn collectible_fraction(collected: u32, total: u32) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (f64::from(collected) / f64::from(total)).clamp(0.0, 1.0)
}
