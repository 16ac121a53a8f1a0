//! Storage seams and the post-session control flow built on them.
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{CatalogError, StampCatalog, UnlockableCatalog};
use crate::constants::LOG_TARGET;
use crate::course::CourseSet;
use crate::diff::{ProgressionEngine, ProgressionUpdate};
use crate::evaluator::Evaluator;
use crate::stars::StarRating;
use crate::stats::{PlayerStatistics, SessionReport};
use crate::unlocks::default_unlocked;

/// Trait for abstracting catalog loading
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the stamp catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or is malformed.
    fn load_stamps(&self) -> Result<StampCatalog, Self::Error>;

    /// Load the unlockable catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or is malformed.
    fn load_unlockables(&self) -> Result<UnlockableCatalog, Self::Error>;

    /// Load course definitions
    ///
    /// # Errors
    ///
    /// Returns an error if the courses cannot be loaded or fail validation.
    fn load_courses(&self) -> Result<CourseSet, Self::Error>;
}

/// Loader backed by the data compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalogs;

impl CatalogLoader for BundledCatalogs {
    type Error = CatalogError;

    fn load_stamps(&self) -> Result<StampCatalog, Self::Error> {
        StampCatalog::load_from_static()
    }

    fn load_unlockables(&self) -> Result<UnlockableCatalog, Self::Error> {
        UnlockableCatalog::load_from_static()
    }

    fn load_courses(&self) -> Result<CourseSet, Self::Error> {
        CourseSet::load_from_static()
    }
}

/// Everything persisted for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProgress {
    pub statistics: PlayerStatistics,
    pub unlocked: BTreeSet<String>,
}

/// Trait for abstracting save/load of player progress
/// Platform-specific implementations should provide this
pub trait ProgressStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save player progress
    ///
    /// # Errors
    ///
    /// Returns an error if the progress cannot be saved.
    fn save_progress(
        &self,
        player_id: &str,
        progress: &PlayerProgress,
    ) -> Result<(), Self::Error>;

    /// Load player progress
    ///
    /// # Errors
    ///
    /// Returns an error if stored progress exists but cannot be read.
    fn load_progress(&self, player_id: &str) -> Result<Option<PlayerProgress>, Self::Error>;

    /// Delete player progress
    ///
    /// # Errors
    ///
    /// Returns an error if the progress cannot be deleted.
    fn delete_progress(&self, player_id: &str) -> Result<(), Self::Error>;
}

/// What one recorded session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    /// Rating of the run, when it completed the course.
    pub rating: Option<StarRating>,
    pub update: ProgressionUpdate,
}

/// Load -> record -> diff -> persist, for callers that want the whole flow.
pub struct ProgressionService<S>
where
    S: ProgressStorage,
{
    engine: ProgressionEngine,
    courses: CourseSet,
    storage: S,
}

impl<S> ProgressionService<S>
where
    S: ProgressStorage,
{
    /// Load catalogs through `loader` and check their cross references.
    ///
    /// # Errors
    ///
    /// Returns an error if any catalog fails to load or a requirement names
    /// an unknown course.
    pub fn new<L: CatalogLoader>(loader: &L, storage: S) -> anyhow::Result<Self> {
        let courses = loader.load_courses().context("loading courses")?;
        let stamps = loader.load_stamps().context("loading stamp catalog")?;
        let unlockables = loader
            .load_unlockables()
            .context("loading unlockable catalog")?;
        stamps
            .check_course_references(&courses)
            .context("checking stamp catalog")?;
        unlockables
            .check_course_references(&courses)
            .context("checking unlockable catalog")?;
        let evaluator = Evaluator::for_courses(&courses);
        Ok(Self {
            engine: ProgressionEngine::new(stamps, unlockables, evaluator),
            courses,
            storage,
        })
    }

    #[must_use]
    pub const fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    #[must_use]
    pub const fn courses(&self) -> &CourseSet {
        &self.courses
    }

    /// Stored progress, or a fresh profile holding the starter unlocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored progress cannot be read.
    pub fn load_progress(&self, player_id: &str) -> anyhow::Result<PlayerProgress> {
        let stored = self
            .storage
            .load_progress(player_id)
            .with_context(|| format!("loading progress for {player_id}"))?;
        Ok(stored.unwrap_or_else(|| PlayerProgress {
            statistics: PlayerStatistics::default(),
            unlocked: default_unlocked(self.engine.unlockables())
                .into_iter()
                .map(|entry| entry.id.clone())
                .collect(),
        }))
    }

    /// Fold one finished run into the player's progress and persist it.
    ///
    /// Stamps earned by this session count toward `stamps_earned`
    /// requirements straight away.
    ///
    /// # Errors
    ///
    /// Returns an error if the course is unknown or storage fails.
    pub fn record_session(
        &self,
        player_id: &str,
        report: &SessionReport,
    ) -> anyhow::Result<SessionOutcome> {
        let Some(course) = self.courses.get(&report.course_id) else {
            bail!("session references unknown course '{}'", report.course_id);
        };
        let mut progress = self.load_progress(player_id)?;
        let rating = progress.statistics.record_session(course, report);

        let previously_unlocked = progress.unlocked.clone();
        let mut new_stamps = Vec::new();
        loop {
            let earned = self
                .engine
                .newly_earned_stamps(&progress.statistics, &progress.statistics.earned_stamps);
            if earned.is_empty() {
                break;
            }
            for stamp in earned {
                new_stamps.push(stamp.id.clone());
                progress.statistics.earned_stamps.insert(stamp.id.clone());
            }
        }
        let unlocks = self.engine.evaluate(
            &progress.statistics,
            &progress.statistics.earned_stamps,
            &previously_unlocked,
        );
        progress.unlocked = unlocks.unlocked.clone();

        self.storage
            .save_progress(player_id, &progress)
            .with_context(|| format!("saving progress for {player_id}"))?;
        log::info!(
            target: LOG_TARGET,
            "recorded {} for {player_id}: {} new stamps, {} new unlocks",
            report.course_id,
            new_stamps.len(),
            unlocks.new_unlocks.len()
        );

        Ok(SessionOutcome {
            rating,
            update: ProgressionUpdate {
                new_stamps,
                new_unlocks: unlocks.new_unlocks,
                earned_stamps: progress.statistics.earned_stamps,
                unlocked: progress.unlocked,
            },
        })
    }

    /// Forget everything stored for `player_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn reset(&self, player_id: &str) -> anyhow::Result<()> {
        self.storage
            .delete_progress(player_id)
            .with_context(|| format!("deleting progress for {player_id}"))
    }
}
