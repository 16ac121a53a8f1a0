//! Stampbook Progression Engine
//!
//! Decides which stamps a player has earned and which courses, skins and
//! modes are unlocked, purely from accumulated player statistics.
//! This crate has no UI, storage or platform dependencies; callers plug those
//! in through [`CatalogLoader`] and [`ProgressStorage`].

pub mod catalog;
pub mod constants;
pub mod course;
pub mod diff;
pub mod evaluator;
pub mod goals;
pub mod predicates;
pub mod progress;
pub mod requirement;
pub mod service;
pub mod stars;
pub mod stats;
pub mod unlocks;
pub mod validate;

// Re-export commonly used types
pub use catalog::{
    CatalogEntry, CatalogError, Rarity, Stamp, StampCatalog, StampCategory, UnlockKind,
    Unlockable, UnlockableCatalog, stamps, unlockables,
};
pub use course::{Area, Bounds, Checkpoint, CourseDefinition, CourseSet, courses};
pub use diff::{ProgressionEngine, ProgressionUpdate, newly_earned};
pub use evaluator::{DEFAULT_TOTAL_COURSES, Evaluator, EvaluatorConfig};
pub use goals::{Goal, next_goals, visible_stamps};
pub use predicates::{PredicateFn, PredicateRegistry};
pub use progress::Progress;
pub use requirement::Requirement;
pub use service::{
    BundledCatalogs, CatalogLoader, PlayerProgress, ProgressStorage, ProgressionService,
    SessionOutcome,
};
pub use stars::{StarRating, rate, rate_against_par};
pub use stats::{BananaTally, PlayerStatistics, SessionReport, collectible_fraction};
pub use unlocks::{default_unlocked, is_unlocked, next_locked, progress_for, unlocked_ids};
pub use validate::{CourseIssue, ValidationReport, validate};
