//! Stamp and unlockable catalogs.
//!
//! Catalogs are loaded once, checked, and never mutated afterwards. Loading
//! is the one place where bad data is fatal: duplicate ids, a missing starter
//! entry or a requirement naming an unknown course all refuse to load.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hasher;
use std::sync::OnceLock;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::constants::{BUNDLED_STAMPS_JSON, BUNDLED_UNLOCKABLES_JSON, LOG_TARGET};
use crate::course::CourseSet;
use crate::requirement::Requirement;

/// Errors raised while loading static catalog and course data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog entry has an empty id")]
    EmptyId,
    #[error("duplicate id '{0}'")]
    DuplicateId(String),
    #[error("no starter {0} (an entry with requirement type 'none') is defined")]
    MissingDefault(UnlockKind),
    #[error("{kind} entries '{first}' and '{second}' are both starters")]
    MultipleDefaults {
        kind: UnlockKind,
        first: String,
        second: String,
    },
    #[error("entry '{entry}' references unknown course '{course}'")]
    UnknownCourse { entry: String, course: String },
    #[error("course '{id}' is invalid: {}", .errors.join("; "))]
    InvalidCourse { id: String, errors: Vec<String> },
}

/// Shared view over stamps and unlockables.
pub trait CatalogEntry {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn requirement(&self) -> &Requirement;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StampCategory {
    Collection,
    Mastery,
    Speed,
    Skill,
    Dedication,
    Secret,
}

impl StampCategory {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Collection => "Collection",
            Self::Mastery => "Mastery",
            Self::Speed => "Speed",
            Self::Skill => "Skill",
            Self::Dedication => "Dedication",
            Self::Secret => "Secret",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Sort rank, higher is rarer.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Common => 0,
            Self::Uncommon => 1,
            Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
        }
    }
}

/// An achievement definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: StampCategory,
    pub rarity: Rarity,
    #[serde(default)]
    pub points: u32,
    /// Hidden from listings until earned.
    #[serde(default)]
    pub hidden: bool,
    pub requirement: Requirement,
}

impl CatalogEntry for Stamp {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

/// Content type gated by an unlockable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockKind {
    Course,
    Skin,
    Mode,
}

impl UnlockKind {
    pub const ALL: [Self; 3] = [Self::Course, Self::Skin, Self::Mode];
}

impl std::fmt::Display for UnlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Course => write!(f, "course"),
            Self::Skin => write!(f, "skin"),
            Self::Mode => write!(f, "mode"),
        }
    }
}

/// Gated content. Course unlockables use the course id as their own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unlockable {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub kind: UnlockKind,
    /// Position in the unlock sequence for its kind; lower comes first.
    pub order: u32,
    #[serde(default)]
    pub value: u32,
    pub requirement: Requirement,
}

impl CatalogEntry for Unlockable {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StampCatalog {
    pub stamps: Vec<Stamp>,
}

impl StampCatalog {
    /// Build a catalog from entries, checking ids.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is empty or repeated.
    pub fn new(stamps: Vec<Stamp>) -> Result<Self, CatalogError> {
        check_ids(&stamps)?;
        Ok(Self { stamps })
    }

    /// Load a stamp catalog from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an id is empty or repeated.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let parsed: Self = serde_json::from_str(json)?;
        Self::new(parsed.stamps)
    }

    /// Stamps bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is malformed.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_STAMPS_JSON)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Stamp> {
        self.stamps.iter().find(|stamp| stamp.id == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[Stamp] {
        &self.stamps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stamp> {
        self.stamps.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.stamps.iter().map(|stamp| stamp.points).sum()
    }

    /// Check every course reference against the shipped courses.
    ///
    /// # Errors
    ///
    /// Returns the first requirement that names an unknown course.
    pub fn check_course_references(&self, courses: &CourseSet) -> Result<(), CatalogError> {
        check_course_references(&self.stamps, courses)
    }

    /// Content hash identifying this catalog's data.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        fingerprint(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UnlockableCatalog {
    pub unlockables: Vec<Unlockable>,
}

impl UnlockableCatalog {
    /// Build a catalog from entries.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is empty or repeated, or if any kind lacks
    /// exactly one starter entry.
    pub fn new(unlockables: Vec<Unlockable>) -> Result<Self, CatalogError> {
        check_ids(&unlockables)?;
        for kind in UnlockKind::ALL {
            let mut starters = unlockables
                .iter()
                .filter(|entry| entry.kind == kind && entry.requirement.is_default_unlock());
            let Some(first) = starters.next() else {
                return Err(CatalogError::MissingDefault(kind));
            };
            if let Some(second) = starters.next() {
                return Err(CatalogError::MultipleDefaults {
                    kind,
                    first: first.id.clone(),
                    second: second.id.clone(),
                });
            }
        }
        Ok(Self { unlockables })
    }

    /// Load an unlockable catalog from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the entries break the
    /// rules checked by [`Self::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let parsed: Self = serde_json::from_str(json)?;
        Self::new(parsed.unlockables)
    }

    /// Unlockables bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is malformed.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_UNLOCKABLES_JSON)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Unlockable> {
        self.unlockables.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[Unlockable] {
        &self.unlockables
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Unlockable> {
        self.unlockables.iter()
    }

    /// Entries of one kind, in declaration order.
    pub fn of_kind(&self, kind: UnlockKind) -> impl Iterator<Item = &Unlockable> {
        self.unlockables
            .iter()
            .filter(move |entry| entry.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.unlockables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unlockables.is_empty()
    }

    /// Check every course reference, including that each course unlockable
    /// names a shipped course.
    ///
    /// # Errors
    ///
    /// Returns the first entry that names an unknown course.
    pub fn check_course_references(&self, courses: &CourseSet) -> Result<(), CatalogError> {
        if let Some(entry) = self
            .of_kind(UnlockKind::Course)
            .find(|entry| !courses.contains(&entry.id))
        {
            return Err(CatalogError::UnknownCourse {
                entry: entry.id.clone(),
                course: entry.id.clone(),
            });
        }
        check_course_references(&self.unlockables, courses)
    }

    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        fingerprint(self)
    }
}

fn check_ids<E: CatalogEntry>(entries: &[E]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.id().trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if !seen.insert(entry.id()) {
            return Err(CatalogError::DuplicateId(entry.id().to_string()));
        }
    }
    Ok(())
}

fn check_course_references<E: CatalogEntry>(
    entries: &[E],
    courses: &CourseSet,
) -> Result<(), CatalogError> {
    for entry in entries {
        if let Some(course) = entry.requirement().referenced_course() {
            if !courses.contains(course) {
                return Err(CatalogError::UnknownCourse {
                    entry: entry.id().to_string(),
                    course: course.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn fingerprint<T: Serialize>(value: &T) -> u64 {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    hasher.finish()
}

/// Bundled stamp catalog, parsed once per process.
#[must_use]
pub fn stamps() -> &'static StampCatalog {
    static STAMPS: OnceLock<StampCatalog> = OnceLock::new();
    STAMPS.get_or_init(|| {
        StampCatalog::load_from_static().unwrap_or_else(|err| {
            log::error!(target: LOG_TARGET, "bundled stamps rejected: {err}");
            StampCatalog::default()
        })
    })
}

/// Bundled unlockable catalog, parsed once per process.
#[must_use]
pub fn unlockables() -> &'static UnlockableCatalog {
    static UNLOCKABLES: OnceLock<UnlockableCatalog> = OnceLock::new();
    UNLOCKABLES.get_or_init(|| {
        UnlockableCatalog::load_from_static().unwrap_or_else(|err| {
            log::error!(target: LOG_TARGET, "bundled unlockables rejected: {err}");
            UnlockableCatalog::default()
        })
    })
}
