//! Human-readable colored text formatter.
//!
//! Renders, per document: name, block count, status, and the sorted issue
//! list with severity, location, rule id, message, and fix suggestion —
//! followed by a run summary table.

use crate::issue::{Severity, ValidationResult, ValidationStatus};
use colored::Colorize;

pub fn format(results: &[ValidationResult]) -> String {
    let mut out = String::new();

    for result in results {
        out.push_str(&format_result(result));
    }

    out.push_str(&format_summary(results));
    out
}

fn format_result(result: &ValidationResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        format!("  Skill: {}  ", result.skill).bold().on_blue().white()
    ));
    out.push_str(&format!("  {}\n", result.path.display().to_string().dimmed()));
    out.push_str(&format!("  Code blocks checked: {}\n", result.blocks_checked));

    let (errors, warnings) = result.count_by_severity();
    let status_str = match result.status {
        ValidationStatus::Pass => "PASS".green().bold().to_string(),
        ValidationStatus::PassWithWarnings => {
            format!("{} ({warnings} warnings)", "PASS".yellow().bold())
        }
        ValidationStatus::Fail => {
            format!(
                "{} ({errors} errors, {warnings} warnings)",
                "FAIL".red().bold()
            )
        }
    };
    out.push_str(&format!("  Status: {status_str}\n"));

    if !result.issues.is_empty() {
        out.push('\n');
        for issue in &result.issues {
            let severity_str = match issue.severity {
                Severity::Error => "ERROR".red().bold().to_string(),
                Severity::Warn => " WARN".yellow().bold().to_string(),
            };
            out.push_str(&format!(
                "  [{severity_str}] [{location}] {message}\n",
                location = issue.location,
                message = issue.message,
            ));
            out.push_str(&format!("          Rule: {}\n", issue.rule_id.dimmed()));
            if let Some(ref suggestion) = issue.suggestion {
                out.push_str(&format!("          Fix: {}\n", suggestion.dimmed()));
            }
        }
    }

    out
}

/// Renders the run roll-up after all individual document reports.
fn format_summary(results: &[ValidationResult]) -> String {
    let mut out = String::new();
    let separator = "─".repeat(54);

    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        format!("  Summary  ({} documents)", results.len())
            .bold()
            .underline()
    ));
    out.push_str(&format!("{}\n", separator.dimmed()));

    let mut n_failed = 0usize;
    let mut n_warned = 0usize;
    let mut n_passed = 0usize;
    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;

    for result in results {
        let (icon, status_str) = match result.status {
            ValidationStatus::Pass => {
                n_passed += 1;
                ("✓".green().to_string(), "PASS".green().bold().to_string())
            }
            ValidationStatus::PassWithWarnings => {
                n_warned += 1;
                ("⚠".yellow().to_string(), "WARN".yellow().bold().to_string())
            }
            ValidationStatus::Fail => {
                n_failed += 1;
                ("✗".red().to_string(), "FAIL".red().bold().to_string())
            }
        };

        let (errors, warnings) = result.count_by_severity();
        total_errors += errors;
        total_warnings += warnings;
        out.push_str(&format!(
            "  {icon}  {name:<22} {status_str}  {errors}e {warnings}w\n",
            name = result.skill,
        ));
    }

    out.push_str(&format!("{}\n", separator.dimmed()));
    out.push_str(&format!(
        "  Total: {}  {}  {}  |  {} errors, {} warnings\n",
        format!("{n_failed} failed").red().bold(),
        format!("{n_warned} with warnings").yellow().bold(),
        format!("{n_passed} passed").green().bold(),
        total_errors,
        total_warnings,
    ));

    out
}
