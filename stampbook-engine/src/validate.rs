//! Structural checks for course definitions.
//!
//! Scoring assumes every area has a checkpoint, bounds are non-degenerate and
//! the run has a start and a finish. These checks run over static level data
//! in tests and in the tester so that broken content fails before it ships.
use serde::Serialize;
use thiserror::Error;

use crate::course::CourseDefinition;

/// A single structural finding.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum CourseIssue {
    #[error("course id must not be empty")]
    EmptyId,
    #[error("course name must not be empty")]
    EmptyName,
    #[error("course must have at least one area")]
    NoAreas,
    #[error("area {area} has no checkpoint")]
    MissingCheckpoint { area: String },
    #[error("area {area} bounds must have positive width and height (got {width} x {height})")]
    DegenerateBounds {
        area: String,
        width: f64,
        height: f64,
    },
    #[error("first area {area} checkpoint is not flagged as the start")]
    FirstCheckpointNotStart { area: String },
    #[error("last area {area} checkpoint is not flagged as the finish")]
    LastCheckpointNotFinish { area: String },
    #[error("no checkpoint is flagged as the start")]
    NoStartCheckpoint,
    #[error("no checkpoint is flagged as the finish")]
    NoFinishCheckpoint,
    #[error("declared {declared} areas but found {actual}")]
    AreaCountMismatch { declared: u32, actual: usize },
    #[error("par time must be positive (got {par})")]
    NonPositiveParTime { par: f64 },
}

/// Outcome of validating one course. Errors make the course unusable;
/// warnings flag content that scores oddly but still plays.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<CourseIssue>,
    pub warnings: Vec<CourseIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Check a course definition without modifying it.
#[must_use]
pub fn validate(course: &CourseDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();

    if course.id.trim().is_empty() {
        report.errors.push(CourseIssue::EmptyId);
    }
    if course.name.trim().is_empty() {
        report.errors.push(CourseIssue::EmptyName);
    }
    if course.areas.is_empty() {
        report.errors.push(CourseIssue::NoAreas);
    }

    for area in &course.areas {
        if area.checkpoint.is_none() {
            report.errors.push(CourseIssue::MissingCheckpoint {
                area: area.id.clone(),
            });
        }
        // Written as a negated comparison so NaN sizes are rejected too.
        if !(area.bounds.width > 0.0 && area.bounds.height > 0.0) {
            report.errors.push(CourseIssue::DegenerateBounds {
                area: area.id.clone(),
                width: area.bounds.width,
                height: area.bounds.height,
            });
        }
    }

    check_markers(course, &mut report);

    if let Some(declared) = course.total_areas {
        let actual = course.areas.len();
        if usize::try_from(declared).ok().is_none_or(|d| d != actual) {
            report.warnings.push(CourseIssue::AreaCountMismatch { declared, actual });
        }
    }

    if !(course.par_time_seconds > 0.0) {
        report.warnings.push(CourseIssue::NonPositiveParTime {
            par: course.par_time_seconds,
        });
    }

    report
}

fn check_markers(course: &CourseDefinition, report: &mut ValidationReport) {
    if let Some(first) = course.areas.first() {
        if first.checkpoint.is_some_and(|cp| !cp.is_start) {
            report.warnings.push(CourseIssue::FirstCheckpointNotStart {
                area: first.id.clone(),
            });
        }
    }
    if let Some(last) = course.areas.last() {
        if last.checkpoint.is_some_and(|cp| !cp.is_finish) {
            report.warnings.push(CourseIssue::LastCheckpointNotFinish {
                area: last.id.clone(),
            });
        }
    }
    if course.areas.is_empty() {
        return;
    }
    if course.start_checkpoint().is_none() {
        report.warnings.push(CourseIssue::NoStartCheckpoint);
    }
    if course.finish_checkpoint().is_none() {
        report.warnings.push(CourseIssue::NoFinishCheckpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Area, Bounds, Checkpoint};

    fn area(id: &str, start: bool, finish: bool) -> Area {
        Area {
            id: id.to_string(),
            bounds: Bounds {
                x: 0.0,
                y: 0.0,
                width: 320.0,
                height: 180.0,
            },
            checkpoint: Some(Checkpoint {
                x: 4.0,
                y: 4.0,
                is_start: start,
                is_finish: finish,
            }),
        }
    }

    fn course(areas: Vec<Area>) -> CourseDefinition {
        CourseDefinition {
            id: "lagoon".to_string(),
            name: "Lagoon Loop".to_string(),
            par_time_seconds: 75.0,
            total_bananas: 20,
            total_areas: Some(u32::try_from(areas.len()).unwrap()),
            areas,
        }
    }

    #[test]
    fn well_formed_course_is_clean() {
        let report = validate(&course(vec![area("a1", true, false), area("a2", false, true)]));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn zero_areas_is_an_error() {
        let report = validate(&course(Vec::new()));
        assert!(!report.is_valid());
        assert!(
            report
                .error_messages()
                .iter()
                .any(|m| m.contains("at least one area"))
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_finish_flag_is_only_a_warning() {
        let report = validate(&course(vec![area("a1", true, false), area("a2", false, false)]));
        assert!(report.is_valid());
        assert!(report.warnings.contains(&CourseIssue::LastCheckpointNotFinish {
            area: "a2".to_string()
        }));
        assert!(report.warnings.contains(&CourseIssue::NoFinishCheckpoint));
    }

    #[test]
    fn missing_checkpoint_and_degenerate_bounds_are_errors() {
        let mut broken = area("a1", true, true);
        broken.checkpoint = None;
        broken.bounds.height = 0.0;
        let mut nan_wide = area("a2", false, true);
        nan_wide.bounds.width = f64::NAN;

        let report = validate(&course(vec![broken, nan_wide]));
        assert!(!report.is_valid());
        assert!(report.errors.contains(&CourseIssue::MissingCheckpoint {
            area: "a1".to_string()
        }));
        let degenerate = report
            .errors
            .iter()
            .filter(|issue| matches!(issue, CourseIssue::DegenerateBounds { .. }))
            .count();
        assert_eq!(degenerate, 2);
    }

    #[test]
    fn blank_identity_and_count_mismatch() {
        let mut c = course(vec![area("a1", true, true)]);
        c.id = "  ".to_string();
        c.name = String::new();
        c.total_areas = Some(3);
        c.par_time_seconds = 0.0;

        let report = validate(&c);
        assert_eq!(report.errors, vec![CourseIssue::EmptyId, CourseIssue::EmptyName]);
        assert!(report.warnings.contains(&CourseIssue::AreaCountMismatch {
            declared: 3,
            actual: 1
        }));
        assert!(report.warnings.contains(&CourseIssue::NonPositiveParTime { par: 0.0 }));
    }

    #[test]
    fn missing_start_flag_is_only_a_warning() {
        let report = validate(&course(vec![area("a1", false, false), area("a2", false, true)]));
        assert!(report.is_valid());
        assert!(report.warnings.contains(&CourseIssue::FirstCheckpointNotStart {
            area: "a1".to_string()
        }));
        assert!(report.warnings.contains(&CourseIssue::NoStartCheckpoint));
        assert!(!report.warnings.contains(&CourseIssue::NoFinishCheckpoint));
    }

    #[test]
    fn validation_does_not_mutate_input() {
        let original = course(vec![area("a1", false, false)]);
        let copy = original.clone();
        let _ = validate(&original);
        assert_eq!(original, copy);
    }
}
