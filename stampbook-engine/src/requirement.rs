//! Requirement taxonomy shared by stamps and unlockables.
//!
//! Every variant describes a condition over [`crate::PlayerStatistics`] and
//! nothing else. Requirements never point at other catalog entries, so the
//! implicit unlock graph stays acyclic; keep it that way when adding kinds.
use serde::{Deserialize, Serialize};

/// What must be true of a player's statistics for an entry to be satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Requirement {
    /// Always satisfied. Marks the entries a new player starts with.
    #[default]
    None,
    TotalBananas {
        count: u64,
    },
    TotalCoins {
        count: u64,
    },
    TotalCrashes {
        count: u64,
    },
    PlayTimeHours {
        hours: f64,
    },
    StampsEarned {
        count: u64,
    },
    LongestAirTime {
        seconds: f64,
    },
    /// A near miss at or under `margin` has been recorded.
    NarrowEscape {
        margin: f64,
    },
    CourseCompleted {
        course_id: String,
    },
    /// Completed without losing a life.
    CoursePerfected {
        course_id: String,
    },
    CourseStars {
        course_id: String,
        stars: u8,
    },
    /// Best time at or under `max_seconds`.
    SpeedRun {
        course_id: String,
        max_seconds: f64,
    },
    CourseScore {
        course_id: String,
        score: u64,
    },
    MechanismUsed {
        course_id: String,
    },
    /// Finished a run while leaving at least `min_skipped` bananas behind.
    SkipCollectibles {
        course_id: String,
        min_skipped: u32,
    },
    AllCoursesCompleted,
    AllCoursesPerfected,
    AllCoursesThreeStars,
    /// Resolved through a caller-supplied [`crate::PredicateRegistry`].
    Named {
        key: String,
    },
}

impl Requirement {
    /// Stable tag, matching the serialized `type` field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TotalBananas { .. } => "total_bananas",
            Self::TotalCoins { .. } => "total_coins",
            Self::TotalCrashes { .. } => "total_crashes",
            Self::PlayTimeHours { .. } => "play_time_hours",
            Self::StampsEarned { .. } => "stamps_earned",
            Self::LongestAirTime { .. } => "longest_air_time",
            Self::NarrowEscape { .. } => "narrow_escape",
            Self::CourseCompleted { .. } => "course_completed",
            Self::CoursePerfected { .. } => "course_perfected",
            Self::CourseStars { .. } => "course_stars",
            Self::SpeedRun { .. } => "speed_run",
            Self::CourseScore { .. } => "course_score",
            Self::MechanismUsed { .. } => "mechanism_used",
            Self::SkipCollectibles { .. } => "skip_collectibles",
            Self::AllCoursesCompleted => "all_courses_completed",
            Self::AllCoursesPerfected => "all_courses_perfected",
            Self::AllCoursesThreeStars => "all_courses_three_stars",
            Self::Named { .. } => "named",
        }
    }

    /// Course whose per-course statistics this requirement reads, if any.
    #[must_use]
    pub fn referenced_course(&self) -> Option<&str> {
        match self {
            Self::CourseCompleted { course_id }
            | Self::CoursePerfected { course_id }
            | Self::CourseStars { course_id, .. }
            | Self::SpeedRun { course_id, .. }
            | Self::CourseScore { course_id, .. }
            | Self::MechanismUsed { course_id }
            | Self::SkipCollectibles { course_id, .. } => Some(course_id),
            Self::None
            | Self::TotalBananas { .. }
            | Self::TotalCoins { .. }
            | Self::TotalCrashes { .. }
            | Self::PlayTimeHours { .. }
            | Self::StampsEarned { .. }
            | Self::LongestAirTime { .. }
            | Self::NarrowEscape { .. }
            | Self::AllCoursesCompleted
            | Self::AllCoursesPerfected
            | Self::AllCoursesThreeStars
            | Self::Named { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_default_unlock(&self) -> bool {
        matches!(self, Self::None)
    }
}
