use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

/// Where an issue points in the source document.
///
/// Document-level issues carry no block. Block-scoped issues carry the block
/// index and, when a specific line is known, the 1-based line number in the
/// **source file's** coordinate space (not block-relative).
///
/// The derived `Ord` is the canonical report ordering: `Document` sorts
/// before every `Block`, and block issues sort by `(index, line)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Document,
    Block { index: usize, line: Option<usize> },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Document => write!(f, "document"),
            Location::Block {
                index,
                line: Some(line),
            } => write!(f, "block {index}, line {line}"),
            Location::Block { index, line: None } => write!(f, "block {index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    pub suggestion: Option<String>,
}

impl Issue {
    /// Document-level issue with no suggestion.
    pub fn document(rule_id: &str, severity: Severity, message: impl Into<String>) -> Self {
        Issue {
            rule_id: rule_id.to_string(),
            severity,
            message: message.into(),
            location: Location::Document,
            suggestion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationStatus {
    Pass,
    PassWithWarnings,
    Fail,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "pass"),
            ValidationStatus::PassWithWarnings => write!(f, "pass-with-warnings"),
            ValidationStatus::Fail => write!(f, "fail"),
        }
    }
}

/// The outcome of validating one document.
///
/// Built exclusively through [`ValidationResult::from_issues`], which sorts
/// the issue list into canonical order and derives the status; neither is
/// ever set directly.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    pub skill: String,
    pub path: PathBuf,
    pub blocks_checked: usize,
    pub issues: Vec<Issue>,
    pub status: ValidationStatus,
}

impl ValidationResult {
    /// Assembles a result: sorts issues by `(location, rule_id)` — putting
    /// document-level issues first — and derives the status.
    pub fn from_issues(
        skill: &str,
        path: &std::path::Path,
        blocks_checked: usize,
        mut issues: Vec<Issue>,
    ) -> Self {
        issues.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        let status = derive_status(&issues);
        ValidationResult {
            skill: skill.to_string(),
            path: path.to_path_buf(),
            blocks_checked,
            issues,
            status,
        }
    }

    pub fn passed(&self) -> bool {
        !matches!(self.status, ValidationStatus::Fail)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warn)
            .count()
    }

    /// Count errors and warnings in a single pass.
    ///
    /// Returns `(errors, warnings)`. Prefer this over calling
    /// `error_count()` + `warning_count()` separately when both values are
    /// needed at the same time (e.g. summary rendering).
    pub fn count_by_severity(&self) -> (usize, usize) {
        self.issues
            .iter()
            .fold((0, 0), |(e, w), i| match i.severity {
                Severity::Error => (e + 1, w),
                Severity::Warn => (e, w + 1),
            })
    }
}

fn derive_status(issues: &[Issue]) -> ValidationStatus {
    // Single pass: track both flags simultaneously.
    let (has_errors, has_warnings) =
        issues
            .iter()
            .fold((false, false), |(e, w), i| match i.severity {
                Severity::Error => (true, w),
                Severity::Warn => (e, true),
            });

    if has_errors {
        ValidationStatus::Fail
    } else if has_warnings {
        ValidationStatus::PassWithWarnings
    } else {
        ValidationStatus::Pass
    }
}
