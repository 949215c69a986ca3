//! Python syntax validation for example blocks.
//!
//! Many examples are intentionally partial fragments (a single function
//! body, a dangling expression) rather than standalone programs, so a single
//! strict parse would flood legitimate teaching material with false
//! positives. The strategy is: strict parse first; on failure retry once
//! with the block wrapped in a synthetic enclosing function; only when both
//! attempts fail is `syntax/invalid` emitted, carrying the strict attempt's
//! message with the error line mapped back into the block's absolute range.
//!
//! Blocks with an unrecognized or absent language tag are skipped here but
//! remain visible to the pattern-based rules.

use crate::blocks::CodeBlock;
use crate::document::SkillDocument;
use crate::issue::{Issue, Location, Severity};
use crate::rules::{Rule, RuleContext, RuleInfo};
use tree_sitter::{Node, Parser};

/// Language tags treated as the target scripting language.
const PYTHON_TAGS: &[&str] = &["python", "py"];

pub fn is_python_tag(tag: &str) -> bool {
    PYTHON_TAGS.contains(&tag)
}

/// First syntax error found in a parse attempt.
struct ParseFailure {
    /// 0-based row within the parsed text.
    row: usize,
    message: String,
}

fn python_parser() -> Parser {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .expect("Python grammar is incompatible with the linked tree-sitter runtime");
    parser
}

/// Parses `code` and returns the first syntax error, or `None` when the
/// parse is clean.
fn parse_failure(code: &str) -> Option<ParseFailure> {
    let mut parser = python_parser();
    let Some(tree) = parser.parse(code, None) else {
        return Some(ParseFailure {
            row: 0,
            message: "invalid Python syntax: parser produced no tree".to_string(),
        });
    };

    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let node = first_error_node(root).unwrap_or(root);
    let row = node.start_position().row;
    let message = if node.is_missing() {
        format!("invalid Python syntax: missing {}", node.kind())
    } else {
        match node.utf8_text(code.as_bytes()) {
            Ok(text) => {
                let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
                if snippet.trim().is_empty() {
                    "invalid Python syntax".to_string()
                } else {
                    format!("invalid Python syntax near '{}'", snippet.trim())
                }
            }
            Err(_) => "invalid Python syntax".to_string(),
        }
    };

    Some(ParseFailure { row, message })
}

/// Depth-first search for the first ERROR or missing node. The `has_error`
/// flag is cumulative, so error-free subtrees are pruned without descent.
fn first_error_node(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    None
}

/// Wraps a fragment in a synthetic enclosing function so that
/// statement-level fragments (`return`, `yield`, bare `await`) parse.
fn wrap_fragment(code: &str) -> String {
    let mut wrapped = String::from("def _fragment():\n");
    for line in code.lines() {
        wrapped.push_str("    ");
        wrapped.push_str(line);
        wrapped.push('\n');
    }
    wrapped
}

/// Returns `true` when `code` parses either as a program unit or as a
/// function-wrapped fragment. Shared with the anti-pattern rule, which only
/// analyzes syntax-valid blocks.
pub fn is_parseable(code: &str) -> bool {
    parse_failure(code).is_none() || parse_failure(&wrap_fragment(code)).is_none()
}

pub struct SyntaxRule;

impl Rule for SyntaxRule {
    fn name(&self) -> &'static str {
        "syntax"
    }

    fn description(&self) -> &'static str {
        "Python example blocks must parse (strict, then fragment-wrapped)"
    }

    fn check(&self, _doc: &SkillDocument, blocks: &[CodeBlock], _ctx: &RuleContext) -> Vec<Issue> {
        let mut issues = Vec::new();

        for block in blocks {
            if !is_python_tag(&block.language) {
                continue;
            }

            let Some(strict) = parse_failure(&block.text) else {
                continue;
            };
            if parse_failure(&wrap_fragment(&block.text)).is_none() {
                continue;
            }

            // Content lines run from start_line to end_line - 1 (the closing
            // fence); clamp the mapped row into that range.
            let last_content = block.end_line.saturating_sub(1).max(block.start_line);
            let line = (block.start_line + strict.row).min(last_content);

            issues.push(Issue {
                rule_id: "syntax/invalid".to_string(),
                severity: Severity::Error,
                message: strict.message,
                location: Location::Block {
                    index: block.index,
                    line: Some(line),
                },
                suggestion: None,
            });
        }

        issues
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![RuleInfo {
        id: "syntax/invalid",
        severity: "error",
        rule: "syntax",
        message: "Python example does not parse, even as a wrapped fragment",
        remediation: "Fix the syntax error; examples should at least parse as a function body",
    }]
}
