use skillcheck::config::Config;
use skillcheck::issue::{Location, Severity, ValidationStatus};
use skillcheck::validate::{quick_check, validate_skills};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_skill(root: &Path, name: &str, content: &str) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("SKILL.md"), content).unwrap();
    dir
}

const CLEAN: &str = "\
---
name: clean
description: A well-formed guide
---

# Guide

## Critical Rules

```python
from langgraph.graph import StateGraph

builder = StateGraph(dict)
```

## Common Gotchas

text
";

const WARN_ONLY: &str = "\
---
name: warny
description: Missing its gotchas section
---

# Guide

## Critical Rules

text
";

const FAILING: &str = "\
---
name: bad
description: Broken example
---

# Guide

## Critical Rules

```python
graph.invoke({\"messages\": []}
```

## Common Gotchas

text
";

// ---------------------------------------------------------------------------
// Status derivation
// ---------------------------------------------------------------------------

#[test]
fn clean_document_passes_with_empty_issue_list() {
    let root = tempfile::tempdir().unwrap();
    let dir = make_skill(root.path(), "clean", CLEAN);

    let results = validate_skills(&[dir], &Config::default());
    assert_eq!(results.len(), 1);

    let result = &results[0];
    assert_eq!(result.status, ValidationStatus::Pass);
    assert!(result.issues.is_empty());
    assert_eq!(result.blocks_checked, 1);
}

#[test]
fn warnings_only_is_pass_with_warnings() {
    let root = tempfile::tempdir().unwrap();
    let dir = make_skill(root.path(), "warny", WARN_ONLY);

    let results = validate_skills(&[dir], &Config::default());
    assert_eq!(results[0].status, ValidationStatus::PassWithWarnings);
    assert!(results[0].passed());
}

#[test]
fn any_error_is_fail() {
    let root = tempfile::tempdir().unwrap();
    let dir = make_skill(root.path(), "bad", FAILING);

    let results = validate_skills(&[dir], &Config::default());
    assert_eq!(results[0].status, ValidationStatus::Fail);
    assert!(!results[0].passed());
}

// ---------------------------------------------------------------------------
// Ordering and determinism
// ---------------------------------------------------------------------------

#[test]
fn document_level_issues_sort_before_block_issues() {
    // Missing gotchas (document-level warn) + broken syntax (block error).
    let content = "\
---
name: mixed
description: d
---

# Guide

## Critical Rules

```python
graph.invoke({\"x\": []}
```
";
    let root = tempfile::tempdir().unwrap();
    let dir = make_skill(root.path(), "mixed", content);

    let results = validate_skills(&[dir], &Config::default());
    let issues = &results[0].issues;
    assert!(issues.len() >= 2);
    assert_eq!(issues[0].location, Location::Document);
    assert!(matches!(issues.last().unwrap().location, Location::Block { .. }));

    // The full list is sorted by (location, rule id).
    let mut sorted = issues.clone();
    sorted.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
    assert_eq!(*issues, sorted);
}

#[test]
fn rerun_on_identical_input_is_deterministic() {
    let root = tempfile::tempdir().unwrap();
    let dirs = vec![
        make_skill(root.path(), "a-bad", FAILING),
        make_skill(root.path(), "b-warn", WARN_ONLY),
        make_skill(root.path(), "c-clean", CLEAN),
    ];

    let config = Config::default();
    let first = validate_skills(&dirs, &config);
    let second = validate_skills(&dirs, &config);

    let render = |results: &[skillcheck::issue::ValidationResult]| {
        serde_json::to_string(results).unwrap()
    };
    assert_eq!(render(&first), render(&second));
}

#[test]
fn results_follow_discovery_order_not_completion_order() {
    let root = tempfile::tempdir().unwrap();
    let dirs = vec![
        make_skill(root.path(), "zz-first", CLEAN),
        make_skill(root.path(), "aa-second", FAILING),
    ];

    let results = validate_skills(&dirs, &Config::default());
    assert_eq!(results[0].skill, "zz-first");
    assert_eq!(results[1].skill, "aa-second");
}

// ---------------------------------------------------------------------------
// Load errors and isolation
// ---------------------------------------------------------------------------

#[test]
fn load_error_fails_one_document_without_touching_siblings() {
    let root = tempfile::tempdir().unwrap();
    let broken = make_skill(root.path(), "broken-fm", "---\nname: x\nnot a kv line\n---\n");
    let clean = make_skill(root.path(), "clean", CLEAN);

    let results = validate_skills(&[broken, clean], &Config::default());
    assert_eq!(results.len(), 2);

    let failed = &results[0];
    assert_eq!(failed.status, ValidationStatus::Fail);
    assert_eq!(failed.blocks_checked, 0);
    assert_eq!(failed.issues.len(), 1);
    assert_eq!(failed.issues[0].rule_id, "loader/invalid-front-matter");
    assert_eq!(failed.issues[0].severity, Severity::Error);

    assert_eq!(results[1].status, ValidationStatus::Pass);
}

#[test]
fn unterminated_fence_is_one_error_and_zero_blocks() {
    let content = "\
---
name: dangling
description: d
---

# Guide

## Critical Rules

```python
x = 1

## Common Gotchas
";
    let root = tempfile::tempdir().unwrap();
    let dir = make_skill(root.path(), "dangling", content);

    let results = validate_skills(&[dir], &Config::default());
    let result = &results[0];
    assert_eq!(result.blocks_checked, 0);

    let hits: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.rule_id == "structure/unterminated-block")
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].severity, Severity::Error);
    assert_eq!(result.status, ValidationStatus::Fail);
}

#[test]
fn disabled_rules_are_skipped() {
    let root = tempfile::tempdir().unwrap();
    let dir = make_skill(root.path(), "warny", WARN_ONLY);

    let mut config = Config::default();
    config.rules.disabled.push("structure".to_string());

    let results = validate_skills(&[dir], &Config::default());
    assert_eq!(results[0].status, ValidationStatus::PassWithWarnings);

    let dir = root.path().join("warny");
    let results = validate_skills(&[dir], &config);
    assert_eq!(results[0].status, ValidationStatus::Pass);
}

// ---------------------------------------------------------------------------
// Quick mode
// ---------------------------------------------------------------------------

#[test]
fn quick_check_passes_a_clean_scope() {
    let root = tempfile::tempdir().unwrap();
    let dirs = vec![
        make_skill(root.path(), "clean", CLEAN),
        make_skill(root.path(), "warny", WARN_ONLY),
    ];

    // Warnings do not fail the quick gate.
    assert!(quick_check(&dirs, &Config::default()).is_none());
}

#[test]
fn quick_check_names_the_first_failing_skill() {
    let root = tempfile::tempdir().unwrap();
    let dirs = vec![
        make_skill(root.path(), "clean", CLEAN),
        make_skill(root.path(), "bad", FAILING),
    ];

    assert_eq!(quick_check(&dirs, &Config::default()).as_deref(), Some("bad"));
}
