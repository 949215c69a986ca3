use skillcheck::blocks::extract_blocks;
use skillcheck::config::Config;
use skillcheck::document::SkillDocument;
use skillcheck::issue::{Issue, Location, Severity};
use skillcheck::rules::structure::StructureRule;
use skillcheck::rules::{Rule, RuleContext};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn doc(body: &str, primary: bool) -> SkillDocument {
    SkillDocument {
        path: PathBuf::from("SKILL.md"),
        skill: "test-skill".to_string(),
        front_matter: BTreeMap::new(),
        body: body.to_string(),
        primary,
    }
}

fn run_structure(body: &str, primary: bool) -> Vec<Issue> {
    let document = doc(body, primary);
    let extracted = extract_blocks(body);
    let config = Config::default();
    StructureRule.check(&document, &extracted.blocks, &RuleContext { config: &config })
}

// ---------------------------------------------------------------------------
// Rule: structure/missing-*
// ---------------------------------------------------------------------------

#[test]
fn both_sections_present_is_clean() {
    let body = "# Guide\n\n## Critical Rules\n\ntext\n\n## Common Gotchas\n\ntext\n";
    assert!(run_structure(body, true).is_empty());
}

#[test]
fn missing_gotchas_yields_exactly_one_warning_and_no_errors() {
    let body = "# Guide\n\n## Critical Rules\n\ntext\n";
    let issues = run_structure(body, true);

    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.rule_id, "structure/missing-gotchas");
    assert_eq!(issue.severity, Severity::Warn);
    assert_eq!(issue.location, Location::Document);
}

#[test]
fn missing_critical_rules_yields_warning() {
    let body = "# Guide\n\n## Common Gotchas\n\ntext\n";
    let issues = run_structure(body, true);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule_id, "structure/missing-critical-rules");
}

#[test]
fn missing_both_yields_two_warnings() {
    let issues = run_structure("# Guide\n\njust prose\n", true);
    assert_eq!(issues.len(), 2);
}

// ---------------------------------------------------------------------------
// Heading normalization
// ---------------------------------------------------------------------------

#[test]
fn punctuation_and_case_are_ignored() {
    let body = "# Guide\n\n### CRITICAL guidance!\n\n## Gotchas & Pitfalls...\n";
    assert!(run_structure(body, true).is_empty());
}

#[test]
fn pitfalls_heading_satisfies_the_gotchas_requirement() {
    let body = "# Guide\n\n## Critical Rules\n\n## Known Pitfalls\n";
    assert!(run_structure(body, true).is_empty());
}

#[test]
fn headings_inside_code_blocks_do_not_count() {
    let body = "\
# Guide

```python
# Critical Rules
# Common Gotchas
x = 1
```
";
    let issues = run_structure(body, true);
    assert_eq!(issues.len(), 2);
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

#[test]
fn reference_documents_are_exempt() {
    let issues = run_structure("# Notes\n\njust prose\n", false);
    assert!(issues.is_empty());
}
