use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use stampbook_engine::{
    CatalogEntry, Requirement, StampCatalog, UnlockKind, UnlockableCatalog, validate,
};

use crate::data::DataSet;

/// Lowercase snake case, starting with a letter.
const ID_PATTERN: &str = r"^[a-z][a-z0-9_]*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
}

impl CheckReport {
    fn error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.findings.push(Finding {
            severity: Severity::Error,
            subject: subject.into(),
            message: message.into(),
        });
    }

    fn warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.findings.push(Finding {
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
    }

    pub fn passed(&self) -> bool {
        self.errors().next().is_none()
    }
}

fn id_regex() -> &'static Regex {
    static ID_REGEX: OnceLock<Regex> = OnceLock::new();
    ID_REGEX.get_or_init(|| Regex::new(ID_PATTERN).expect("id pattern compiles"))
}

/// Run every data check. Unlike the engine's loaders this keeps going after
/// the first problem.
pub fn run_checks(data: &DataSet) -> CheckReport {
    let mut report = CheckReport::default();
    check_courses(data, &mut report);
    check_stamps(data, &mut report);
    check_unlockables(data, &mut report);
    report
}

fn check_courses(data: &DataSet, report: &mut CheckReport) {
    if data.courses.is_empty() {
        report.error("courses", "no courses defined");
    }
    let mut seen = std::collections::HashSet::new();
    for course in data.courses.iter() {
        let subject = format!("course {}", course.id);
        check_id_format(&course.id, &subject, report);
        if !seen.insert(course.id.as_str()) {
            report.error(&subject, "duplicate course id");
        }
        let validation = validate(course);
        for message in validation.error_messages() {
            report.error(&subject, message);
        }
        for message in validation.warning_messages() {
            report.warning(&subject, message);
        }
        let gated = data
            .unlockables
            .get(&course.id)
            .is_some_and(|entry| entry.kind == UnlockKind::Course);
        if !gated {
            report.warning(&subject, "no course unlockable gates this course");
        }
    }
}

fn check_stamps(data: &DataSet, report: &mut CheckReport) {
    if let Err(err) = StampCatalog::new(data.stamps.stamps.clone()) {
        report.error("stamps", err.to_string());
    }
    for stamp in data.stamps.iter() {
        let subject = format!("stamp {}", stamp.id);
        check_entry(stamp, &subject, data, report);
        if stamp.requirement.is_default_unlock() {
            report.warning(&subject, "stamp is earned by every player");
        }
    }
}

fn check_unlockables(data: &DataSet, report: &mut CheckReport) {
    if let Err(err) = UnlockableCatalog::new(data.unlockables.unlockables.clone()) {
        report.error("unlockables", err.to_string());
    }
    for entry in data.unlockables.iter() {
        let subject = format!("unlockable {}", entry.id);
        check_entry(entry, &subject, data, report);
        if entry.kind == UnlockKind::Course && !data.courses.contains(&entry.id) {
            report.error(&subject, "course unlockable has no course definition");
        }
    }
}

fn check_entry<E: CatalogEntry>(
    entry: &E,
    subject: &str,
    data: &DataSet,
    report: &mut CheckReport,
) {
    check_id_format(entry.id(), subject, report);
    if entry.name().trim().is_empty() {
        report.error(subject, "name must not be empty");
    }
    match entry.requirement() {
        Requirement::Named { key } => report.warning(
            subject,
            format!("named requirement '{key}' needs a registered predicate at runtime"),
        ),
        requirement => {
            if let Some(course) = requirement.referenced_course() {
                if !data.courses.contains(course) {
                    report.error(subject, format!("references unknown course '{course}'"));
                }
            }
        }
    }
}

fn check_id_format(id: &str, subject: &str, report: &mut CheckReport) {
    if !id_regex().is_match(id) {
        report.error(subject, format!("id '{id}' does not match {ID_PATTERN}"));
    }
}
