//! Course definitions as loaded from static level data.
//!
//! Only the fields that scoring and validation read are modelled here; the
//! rest of the level geometry belongs to the simulation layer.
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::catalog::CatalogError;
use crate::constants::{BUNDLED_COURSES_JSON, LOG_TARGET};
use crate::validate::validate;

/// Axis-aligned bounds of an area, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub is_finish: bool,
}

/// One contiguous section of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Area {
    pub id: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub checkpoint: Option<Checkpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CourseDefinition {
    pub id: String,
    pub name: String,
    pub par_time_seconds: f64,
    #[serde(default)]
    pub total_bananas: u32,
    /// Area count declared by the level author, checked against `areas`.
    #[serde(default)]
    pub total_areas: Option<u32>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

impl CourseDefinition {
    #[must_use]
    pub fn start_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints().find(|cp| cp.is_start)
    }

    #[must_use]
    pub fn finish_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints().find(|cp| cp.is_finish)
    }

    pub fn checkpoints(&self) -> impl Iterator<Item = &Checkpoint> {
        self.areas.iter().filter_map(|area| area.checkpoint.as_ref())
    }
}

/// All course definitions shipped with a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CourseSet {
    pub courses: Vec<CourseDefinition>,
}

impl CourseSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            courses: Vec::new(),
        }
    }

    /// Load and validate course definitions from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, if two courses share an
    /// id, or if any course fails structural validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let set: Self = serde_json::from_str(json)?;
        set.checked()
    }

    /// Validate already-parsed courses.
    ///
    /// # Errors
    ///
    /// Returns an error if two courses share an id or any course fails
    /// structural validation. Warnings are logged and do not fail the load.
    pub fn checked(self) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for course in &self.courses {
            if !course.id.is_empty() && !seen.insert(course.id.as_str()) {
                return Err(CatalogError::DuplicateId(course.id.clone()));
            }
            let report = validate(course);
            for warning in &report.warnings {
                log::warn!(target: LOG_TARGET, "course {}: {warning}", course.id);
            }
            if !report.is_valid() {
                return Err(CatalogError::InvalidCourse {
                    id: course.id.clone(),
                    errors: report.error_messages(),
                });
            }
        }
        Ok(self)
    }

    /// Courses bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is malformed.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_COURSES_JSON)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CourseDefinition> {
        self.courses.iter().find(|course| course.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CourseDefinition> {
        self.courses.iter()
    }
}

/// Bundled courses, parsed once per process. Malformed bundled data yields an
/// empty set; the crate's data tests keep that from shipping.
#[must_use]
pub fn courses() -> &'static CourseSet {
    static COURSES: OnceLock<CourseSet> = OnceLock::new();
    COURSES.get_or_init(|| {
        CourseSet::load_from_static().unwrap_or_else(|err| {
            log::error!(target: LOG_TARGET, "bundled courses rejected: {err}");
            CourseSet::empty()
        })
    })
}
