use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use crate::checks::{CheckReport, Severity};
use crate::data::DataSet;
use crate::evaluation::Evaluation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: String,
    pub data_source: String,
    pub stamps_fingerprint: String,
    pub unlockables_fingerprint: String,
    pub passed: bool,
    pub checks: CheckReport,
    pub evaluation: Option<Evaluation>,
}

impl Report {
    pub fn new(data: &DataSet, checks: CheckReport, evaluation: Option<Evaluation>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            data_source: data.source.clone(),
            stamps_fingerprint: format!("{:016x}", data.stamps.fingerprint()),
            unlockables_fingerprint: format!("{:016x}", data.unlockables.fingerprint()),
            passed: checks.passed(),
            checks,
            evaluation,
        }
    }
}

pub fn generate_console_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Stampbook Data Report".bright_cyan().bold())?;
    writeln!(out, "{}", "========================".cyan())?;
    writeln!(out, "Data source: {}", report.data_source)?;
    writeln!(out, "Stamps fingerprint: {}", report.stamps_fingerprint)?;
    writeln!(out, "Unlockables fingerprint: {}", report.unlockables_fingerprint)?;
    writeln!(out)?;

    let errors = report.checks.errors().count();
    let warnings = report.checks.warnings().count();
    let status = if report.passed {
        "✅ Validation passed".green()
    } else {
        "❌ Validation failed".red()
    };
    writeln!(out, "{status}")?;
    writeln!(out, "Errors: {}", errors.to_string().red())?;
    writeln!(out, "Warnings: {}", warnings.to_string().yellow())?;
    for finding in &report.checks.findings {
        let marker = match finding.severity {
            Severity::Error => "✗".red(),
            Severity::Warning => "!".yellow(),
        };
        writeln!(out, "   {marker} {}: {}", finding.subject.bold(), finding.message)?;
    }

    if let Some(evaluation) = &report.evaluation {
        writeln!(out)?;
        writeln!(out, "{}", "🏅 Player Progress".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        writeln!(
            out,
            "Stamps earned: {}/{}",
            evaluation.earned_count, evaluation.stamp_count
        )?;
        for id in &evaluation.new_stamps {
            writeln!(out, "   {} {}", "+ stamp".green(), id)?;
        }
        for id in &evaluation.new_unlocks {
            writeln!(out, "   {} {}", "+ unlock".green(), id)?;
        }
        for next in &evaluation.next_unlocks {
            writeln!(
                out,
                "   Next {}: {} ({:.0}%)",
                next.kind, next.entry.name, next.entry.progress.percent_complete
            )?;
        }
        if !evaluation.goals.is_empty() {
            writeln!(out, "Goals:")?;
            for goal in &evaluation.goals {
                writeln!(
                    out,
                    "     • {} ({:.0}/{:.0}, {:.0}%)",
                    goal.name,
                    goal.progress.current,
                    goal.progress.target,
                    goal.progress.percent_complete
                )?;
            }
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out, "# Stampbook Data Report\n")?;
    writeln!(out, "_Generated {}_\n", report.generated_at)?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Data source**: {}", report.data_source)?;
    writeln!(out, "- **Stamps fingerprint**: `{}`", report.stamps_fingerprint)?;
    writeln!(
        out,
        "- **Unlockables fingerprint**: `{}`",
        report.unlockables_fingerprint
    )?;
    let status = if report.passed { "✅ passed" } else { "❌ failed" };
    writeln!(out, "- **Validation**: {status}")?;
    writeln!(out, "- **Errors**: {}", report.checks.errors().count())?;
    writeln!(out, "- **Warnings**: {}\n", report.checks.warnings().count())?;

    if !report.checks.findings.is_empty() {
        writeln!(out, "## Findings\n")?;
        writeln!(out, "| Severity | Subject | Message |")?;
        writeln!(out, "|---|---|---|")?;
        for finding in &report.checks.findings {
            let severity = match finding.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            writeln!(
                out,
                "| {severity} | {} | {} |",
                finding.subject, finding.message
            )?;
        }
        writeln!(out)?;
    }

    if let Some(evaluation) = &report.evaluation {
        writeln!(out, "## Player Progress\n")?;
        writeln!(
            out,
            "- **Stamps earned**: {}/{}",
            evaluation.earned_count, evaluation.stamp_count
        )?;
        if !evaluation.new_stamps.is_empty() {
            writeln!(out, "- **New stamps**: {}", evaluation.new_stamps.join(", "))?;
        }
        if !evaluation.new_unlocks.is_empty() {
            writeln!(out, "- **New unlocks**: {}", evaluation.new_unlocks.join(", "))?;
        }
        for goal in &evaluation.goals {
            writeln!(
                out,
                "- **Goal**: {} ({:.0}%)",
                goal.name, goal.progress.percent_complete
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::run_checks;

    fn sample_report() -> Report {
        let data = DataSet::bundled().unwrap();
        let checks = run_checks(&data);
        Report::new(&data, checks, None)
    }

    #[test]
    fn json_report_is_camel_case() {
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["passed"], true);
        assert_eq!(value["dataSource"], "bundled");
        assert_eq!(value["stampsFingerprint"].as_str().map(str::len), Some(16));
        assert!(value["evaluation"].is_null());
    }

    #[test]
    fn markdown_report_lists_findings() {
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &sample_report()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# Stampbook Data Report"));
        assert!(text.contains("| warning | stamp moonwalker |"));
    }

    #[test]
    fn console_report_shows_status() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, &sample_report()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Validation passed"));
        assert!(text.contains("Data source: bundled"));
    }
}
