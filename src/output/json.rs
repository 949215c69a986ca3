//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document with one entry per validated
//! document plus a run-level summary, for automated consumption.

use crate::issue::ValidationResult;

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    results: &'a [ValidationResult],
    summary: Summary,
}

#[derive(serde::Serialize)]
struct Summary {
    documents: usize,
    failed: usize,
    passed_with_warnings: usize,
    passed: usize,
    errors: usize,
    warnings: usize,
}

/// Formats a whole run as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the results cannot be serialized (should not happen with valid
/// data).
pub fn format(results: &[ValidationResult]) -> String {
    // Single pass over all results for every summary counter.
    let summary = results.iter().fold(
        Summary {
            documents: results.len(),
            failed: 0,
            passed_with_warnings: 0,
            passed: 0,
            errors: 0,
            warnings: 0,
        },
        |mut acc, result| {
            match result.status {
                crate::issue::ValidationStatus::Pass => acc.passed += 1,
                crate::issue::ValidationStatus::PassWithWarnings => {
                    acc.passed_with_warnings += 1
                }
                crate::issue::ValidationStatus::Fail => acc.failed += 1,
            }
            let (errors, warnings) = result.count_by_severity();
            acc.errors += errors;
            acc.warnings += warnings;
            acc
        },
    );

    let output = JsonOutput { results, summary };
    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
