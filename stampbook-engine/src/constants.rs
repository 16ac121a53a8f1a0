//! Centralized tuning constants for Stampbook progression logic.
//!
//! Star thresholds and unit conversions live here so that rating changes
//! only happen through reviewed code, never through catalog JSON.

// Unit conversions -----------------------------------------------------------
pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const PERCENT_MAX: f64 = 100.0;

// Star rating ----------------------------------------------------------------
/// Minimum collectible fraction for a three-star finish.
pub const THREE_STAR_COLLECTIBLE_FRACTION: f64 = 0.90;
/// Deaths must stay strictly below this for a three-star finish.
pub const THREE_STAR_DEATH_LIMIT: u32 = 3;
pub const MAX_STARS: u8 = 3;

// Goals ----------------------------------------------------------------------
pub const DEFAULT_GOAL_LIMIT: usize = 3;

// Bundled data ---------------------------------------------------------------
pub const BUNDLED_COURSES_JSON: &str = include_str!("../data/courses.json");
pub const BUNDLED_STAMPS_JSON: &str = include_str!("../data/stamps.json");
pub const BUNDLED_UNLOCKABLES_JSON: &str = include_str!("../data/unlockables.json");

// Logging keys ---------------------------------------------------------------
pub(crate) const LOG_TARGET: &str = "stampbook";
