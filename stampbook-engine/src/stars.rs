//! Star rating for a single course completion
use serde::{Deserialize, Serialize};

use crate::constants::{THREE_STAR_COLLECTIBLE_FRACTION, THREE_STAR_DEATH_LIMIT};
use crate::course::CourseDefinition;

/// Quality of one course completion. Finishing always earns at least one star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum StarRating {
    One,
    Two,
    Three,
}

impl StarRating {
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.count()
    }
}

impl TryFrom<u8> for StarRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(format!("star rating must be 1-3 (got {other})")),
        }
    }
}

impl std::fmt::Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = usize::from(self.count());
        write!(f, "{}{}", "★".repeat(filled), "☆".repeat(3 - filled))
    }
}

/// Rate a completion of `course`.
///
/// Finishing earns one star. Beating par (ties count) earns one more, and a
/// clean run with at least 90% of the collectibles and fewer than three deaths
/// earns another, so three stars need both.
#[must_use]
pub fn rate(
    course: &CourseDefinition,
    finish_time_seconds: f64,
    collectible_fraction: f64,
    deaths: u32,
) -> StarRating {
    rate_against_par(
        course.par_time_seconds,
        finish_time_seconds,
        collectible_fraction,
        deaths,
    )
}

/// Same as [`rate`] for callers that only carry the par time.
#[must_use]
pub fn rate_against_par(
    par_time_seconds: f64,
    finish_time_seconds: f64,
    collectible_fraction: f64,
    deaths: u32,
) -> StarRating {
    // NaN compares false, so a broken timer never earns the par star.
    let under_par = finish_time_seconds <= par_time_seconds;
    let fraction = if collectible_fraction.is_nan() {
        0.0
    } else {
        collectible_fraction.clamp(0.0, 1.0)
    };
    let clean_run =
        fraction >= THREE_STAR_COLLECTIBLE_FRACTION && deaths < THREE_STAR_DEATH_LIMIT;

    match (under_par, clean_run) {
        (true, true) => StarRating::Three,
        (true, false) | (false, true) => StarRating::Two,
        (false, false) => StarRating::One,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_at_par_time() {
        assert_eq!(rate_against_par(120.0, 120.0, 0.9, 2), StarRating::Three);
        assert_eq!(rate_against_par(120.0, 121.0, 1.0, 0), StarRating::Two);
        assert_eq!(rate_against_par(120.0, 200.0, 0.5, 5), StarRating::One);
    }

    #[test]
    fn par_alone_is_two_stars() {
        assert_eq!(rate_against_par(120.0, 90.0, 0.89, 0), StarRating::Two);
        assert_eq!(rate_against_par(120.0, 90.0, 1.0, 3), StarRating::Two);
        assert_eq!(rate_against_par(120.0, 121.0, 1.0, 3), StarRating::One);
    }

    #[test]
    fn nan_inputs_never_upgrade() {
        assert_eq!(rate_against_par(120.0, f64::NAN, 0.5, 0), StarRating::One);
        assert_eq!(rate_against_par(120.0, 60.0, f64::NAN, 0), StarRating::Two);
    }

    #[test]
    fn rates_through_course_definition() {
        let course = CourseDefinition {
            par_time_seconds: 45.0,
            ..CourseDefinition::default()
        };
        assert_eq!(rate(&course, 44.5, 0.95, 0), StarRating::Three);
        assert_eq!(rate(&course, 45.5, 0.2, 0), StarRating::One);
    }

    #[test]
    fn serializes_as_plain_count() {
        assert_eq!(serde_json::to_string(&StarRating::Two).unwrap(), "2");
        let parsed: StarRating = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, StarRating::Three);
        assert!(serde_json::from_str::<StarRating>("4").is_err());
        assert_eq!(StarRating::Two.to_string(), "★★☆");
    }
}
