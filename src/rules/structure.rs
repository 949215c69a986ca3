//! Required-section checks for primary guides.
//!
//! A skill's primary guide must carry a critical-rules section and a
//! gotchas/pitfalls section. Headings are matched on normalized text —
//! lowercase, surrounding punctuation ignored — so `## Critical Rules!`,
//! `### critical guidance`, and `## Common Gotchas & Pitfalls` all count.
//! Reference sub-documents are exempt.

use crate::blocks::CodeBlock;
use crate::document::SkillDocument;
use crate::issue::{Issue, Severity};
use crate::rules::{Rule, RuleContext, RuleInfo};
use std::sync::LazyLock;

struct RequiredSection {
    id: &'static str,
    keywords: &'static [&'static str],
    message: &'static str,
    suggestion: &'static str,
}

static SECTIONS: &[RequiredSection] = &[
    RequiredSection {
        id: "structure/missing-critical-rules",
        keywords: &["critical"],
        message: "Guide has no critical-rules section",
        suggestion: "Add a '## Critical Rules' section with the must-follow guidance",
    },
    RequiredSection {
        id: "structure/missing-gotchas",
        keywords: &["gotcha", "pitfall"],
        message: "Guide has no gotchas section",
        suggestion: "Add a '## Common Gotchas' section covering the known pitfalls",
    },
];

static RE_HEADING: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^ {0,3}#{1,6}\s+(.+)$").unwrap());

/// Lowercases a heading and strips everything but letters, digits, and
/// single spaces.
fn normalize(heading: &str) -> String {
    let mut out = String::with_capacity(heading.len());
    let mut last_space = true;
    for c in heading.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    out.trim_end().to_string()
}

pub struct StructureRule;

impl Rule for StructureRule {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn description(&self) -> &'static str {
        "Primary guides must contain the required sections"
    }

    fn check(&self, doc: &SkillDocument, blocks: &[CodeBlock], _ctx: &RuleContext) -> Vec<Issue> {
        if !doc.primary {
            return vec![];
        }

        // A `# comment` inside a fenced example is not a heading.
        let in_block = |line_num: usize| {
            blocks
                .iter()
                .any(|b| line_num >= b.start_line.saturating_sub(1) && line_num <= b.end_line)
        };

        let headings: Vec<String> = doc
            .body
            .lines()
            .enumerate()
            .filter(|(idx, _)| !in_block(idx + 1))
            .filter_map(|(_, line)| RE_HEADING.captures(line))
            .map(|cap| normalize(&cap[1]))
            .collect();

        let mut issues = Vec::new();
        for section in SECTIONS {
            let present = headings.iter().any(|h| {
                section
                    .keywords
                    .iter()
                    .any(|k| h.split(' ').any(|word| word.starts_with(k)))
            });
            if !present {
                let mut issue = Issue::document(section.id, Severity::Warn, section.message);
                issue.suggestion = Some(section.suggestion.to_string());
                issues.push(issue);
            }
        }

        issues
    }
}

pub fn rules() -> Vec<RuleInfo> {
    SECTIONS
        .iter()
        .map(|s| RuleInfo {
            id: s.id,
            severity: "warn",
            rule: "structure",
            message: s.message,
            remediation: s.suggestion,
        })
        .collect()
}
