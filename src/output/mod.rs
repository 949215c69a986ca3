//! Output formatting for validation runs.
//!
//! Three formats are supported:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | CI/CD integration       |
//!
//! Every formatter is a pure function of the results: identical input
//! always yields identical output, which diff-based review and automated
//! gating depend on. There are no timestamps anywhere in a report.

pub mod json;
pub mod pretty;
pub mod sarif;

use crate::issue::ValidationResult;

/// Supported output formats for validation reports.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text with a run summary.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats a whole run — every document's result plus the roll-up — in the
/// requested [`OutputFormat`].
pub fn format_results(results: &[ValidationResult], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(results),
        OutputFormat::Json => json::format(results),
        OutputFormat::Sarif => sarif::format(results),
    }
}
