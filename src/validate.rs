//! Validation orchestration.
//!
//! [`validate_document`] runs one document through the full pipeline:
//! block extraction, every enabled rule in parallel, then aggregation into
//! a [`ValidationResult`]. [`validate_skills`] drives the pipeline over a
//! whole scope of skills in parallel via [rayon], collecting results into a
//! slot per document so the output order always matches discovery order
//! regardless of completion order.
//!
//! # Isolation
//!
//! Rules are isolated at two levels:
//!
//! - A panic inside one rule is caught at the rule boundary and downgraded
//!   to a `warn` `rule/internal-error` issue naming the rule; other rules'
//!   results are unaffected.
//! - Each document carries a rule-execution deadline. Once it expires the
//!   remaining rules are skipped and one document-level `timeout` error is
//!   recorded — only that document fails, and the run always terminates
//!   even when one document's content triggers pathological parsing.

use crate::blocks::extract_blocks;
use crate::config::Config;
use crate::document::{load_skill, LoadError, SkillDocument};
use crate::issue::{Issue, Severity, ValidationResult};
use crate::rules::{all_rules, Rule, RuleContext};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::{Duration, Instant};

enum RuleOutcome {
    Ran(Vec<Issue>),
    TimedOut,
    Panicked(&'static str),
}

/// Runs the full pipeline on one loaded document.
///
/// A [`LoadError`] short-circuits rule execution for this document only: it
/// becomes a single document-level error issue with zero blocks checked.
pub fn validate_document(
    loaded: &Result<SkillDocument, LoadError>,
    config: &Config,
) -> ValidationResult {
    let doc = match loaded {
        Ok(doc) => doc,
        Err(err) => {
            let issue = Issue::document(err.rule_id, Severity::Error, err.message.clone());
            return ValidationResult::from_issues(&err.skill, &err.path, 0, vec![issue]);
        }
    };

    let extracted = extract_blocks(&doc.body);
    let mut issues = Vec::new();
    if let Some(open_line) = extracted.unterminated {
        issues.push(Issue::document(
            "structure/unterminated-block",
            Severity::Error,
            format!("fenced block opened on line {open_line} is never closed"),
        ));
    }

    let deadline = Instant::now() + Duration::from_millis(config.validator.timeout_ms);
    let ctx = RuleContext { config };

    let rules: Vec<Box<dyn Rule>> = all_rules()
        .into_iter()
        .filter(|r| config.is_rule_enabled(r.name()))
        .collect();

    let outcomes: Vec<RuleOutcome> = rules
        .par_iter()
        .map(|rule| {
            if Instant::now() >= deadline {
                return RuleOutcome::TimedOut;
            }
            // Rules are read-only over the document and blocks, so unwinding
            // cannot leave them in a broken state.
            match catch_unwind(AssertUnwindSafe(|| rule.check(doc, &extracted.blocks, &ctx))) {
                Ok(found) => RuleOutcome::Ran(found),
                Err(_) => RuleOutcome::Panicked(rule.name()),
            }
        })
        .collect();

    let mut timed_out = false;
    for outcome in outcomes {
        match outcome {
            RuleOutcome::Ran(found) => issues.extend(found),
            RuleOutcome::TimedOut => timed_out = true,
            RuleOutcome::Panicked(name) => issues.push(Issue::document(
                "rule/internal-error",
                Severity::Warn,
                format!("rule '{name}' failed internally and was skipped for this document"),
            )),
        }
    }
    if timed_out {
        issues.push(Issue::document(
            "timeout",
            Severity::Error,
            format!(
                "validation exceeded the {} ms budget; remaining rules were skipped",
                config.validator.timeout_ms
            ),
        ));
    }

    ValidationResult::from_issues(&doc.skill, &doc.path, extracted.blocks.len(), issues)
}

/// Loads every document in the resolved skill directories and validates
/// them in parallel. Results are returned in discovery order: primary guide
/// first, then referenced sub-documents, skill by skill.
pub fn validate_skills(skill_dirs: &[PathBuf], config: &Config) -> Vec<ValidationResult> {
    let docs: Vec<Result<SkillDocument, LoadError>> =
        skill_dirs.iter().flat_map(|dir| load_skill(dir)).collect();

    docs.par_iter()
        .map(|doc| validate_document(doc, config))
        .collect()
}

/// Cheap CI gate: validates the scope but short-circuits at the first
/// failing document, returning its skill name — `None` means everything
/// passed (warnings included).
pub fn quick_check(skill_dirs: &[PathBuf], config: &Config) -> Option<String> {
    let docs: Vec<Result<SkillDocument, LoadError>> =
        skill_dirs.iter().flat_map(|dir| load_skill(dir)).collect();

    docs.par_iter().find_map_first(|doc| {
        let result = validate_document(doc, config);
        (!result.passed()).then_some(result.skill)
    })
}
