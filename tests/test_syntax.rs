use skillcheck::blocks::extract_blocks;
use skillcheck::config::Config;
use skillcheck::document::SkillDocument;
use skillcheck::issue::{Issue, Location, Severity};
use skillcheck::rules::syntax::SyntaxRule;
use skillcheck::rules::{Rule, RuleContext};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn doc(body: &str) -> SkillDocument {
    SkillDocument {
        path: PathBuf::from("SKILL.md"),
        skill: "test-skill".to_string(),
        front_matter: BTreeMap::new(),
        body: body.to_string(),
        primary: true,
    }
}

fn run_syntax(body: &str) -> Vec<Issue> {
    let document = doc(body);
    let extracted = extract_blocks(body);
    let config = Config::default();
    SyntaxRule.check(&document, &extracted.blocks, &RuleContext { config: &config })
}

// ---------------------------------------------------------------------------
// Valid code
// ---------------------------------------------------------------------------

#[test]
fn valid_python_produces_no_issues() {
    let body = "```python\ndef greet(name):\n    return f\"hello {name}\"\n```\n";
    assert!(run_syntax(body).is_empty());
}

#[test]
fn valid_multi_statement_program_produces_no_issues() {
    let body = "```python\nimport os\n\nfor p in os.listdir(\".\"):\n    print(p)\n```\n";
    assert!(run_syntax(body).is_empty());
}

// ---------------------------------------------------------------------------
// Rule: syntax/invalid
// ---------------------------------------------------------------------------

#[test]
fn unclosed_call_yields_exactly_one_error() {
    let body = "```python\nresult = graph.invoke({\"messages\": []}\n```\n";
    let issues = run_syntax(body);
    assert_eq!(issues.len(), 1);

    let issue = &issues[0];
    assert_eq!(issue.rule_id, "syntax/invalid");
    assert_eq!(issue.severity, Severity::Error);
    match issue.location {
        Location::Block { index, line } => {
            assert_eq!(index, 0);
            let line = line.expect("syntax issues carry a line");
            assert!((2..=2).contains(&line), "line {line} outside block range");
        }
        Location::Document => panic!("syntax issues are block-scoped"),
    }
}

#[test]
fn unclosed_def_header_is_an_error() {
    let body = "```python\ndef broken(:\n    pass\n```\n";
    let issues = run_syntax(body);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule_id, "syntax/invalid");
}

#[test]
fn only_the_broken_block_is_flagged() {
    let body = "\
```python
x = 1
```

```python
y = ((1, 2)
```
";
    let issues = run_syntax(body);
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        issues[0].location,
        Location::Block { index: 1, .. }
    ));
}

// ---------------------------------------------------------------------------
// Skipped blocks
// ---------------------------------------------------------------------------

#[test]
fn non_python_tags_are_skipped() {
    let body = "```bash\nif [ -z \"$X\" ; then\n```\n";
    assert!(run_syntax(body).is_empty());
}

#[test]
fn untagged_blocks_are_skipped() {
    let body = "```\nthis is ((( not python\n```\n";
    assert!(run_syntax(body).is_empty());
}

#[test]
fn py_tag_is_recognized() {
    let body = "```py\nz = (1,\n```\n";
    let issues = run_syntax(body);
    assert_eq!(issues.len(), 1);
}
