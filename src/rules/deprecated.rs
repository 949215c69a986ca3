//! Deprecated-API detection.
//!
//! Consults the immutable deprecated-module map (see
//! [`Config::deprecated_replacement`](crate::config::Config::deprecated_replacement))
//! plus a small table of deprecated call signatures. Every hit is a `warn`
//! `api/deprecated` whose suggestion carries the current replacement.
//! Unknown references are never flagged — absence of evidence is not
//! evidence of deprecation.

use crate::blocks::CodeBlock;
use crate::document::SkillDocument;
use crate::issue::{Issue, Location, Severity};
use crate::rules::{extract_imports, is_counter_example, Rule, RuleContext, RuleInfo};
use regex::Regex;
use std::sync::LazyLock;

struct DeprecatedSignature {
    regex: &'static LazyLock<Regex>,
    message: &'static str,
    replacement: &'static str,
}

static RE_AGENT_EXECUTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"from\s+langchain\.agents\s+import\s+.*\bAgentExecutor\b").unwrap()
});

static RE_OLD_REACT_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"from\s+langchain\.agents\s+import\s+.*\bcreate_react_agent\b").unwrap()
});

static SIGNATURES: &[DeprecatedSignature] = &[
    DeprecatedSignature {
        regex: &RE_AGENT_EXECUTOR,
        message: "AgentExecutor is deprecated; build agents on a state graph instead",
        replacement: "Use create_agent from langchain.agents, or build with StateGraph",
    },
    DeprecatedSignature {
        regex: &RE_OLD_REACT_AGENT,
        message: "create_react_agent from langchain.agents is the old pattern",
        replacement: "Use: from langchain.agents import create_agent",
    },
];

pub struct DeprecatedApiRule;

impl Rule for DeprecatedApiRule {
    fn name(&self) -> &'static str {
        "deprecated"
    }

    fn description(&self) -> &'static str {
        "References to deprecated module paths and call signatures"
    }

    fn check(&self, _doc: &SkillDocument, blocks: &[CodeBlock], ctx: &RuleContext) -> Vec<Issue> {
        let mut issues = Vec::new();

        for block in blocks {
            if is_counter_example(&block.text) {
                continue;
            }

            for import in extract_imports(&block.text) {
                let Some(replacement) = ctx.config.deprecated_replacement(&import.module) else {
                    continue;
                };
                issues.push(Issue {
                    rule_id: "api/deprecated".to_string(),
                    severity: Severity::Warn,
                    message: format!("Deprecated import path: {}", import.module),
                    location: Location::Block {
                        index: block.index,
                        line: Some(block.start_line + import.row),
                    },
                    suggestion: Some(replacement.to_string()),
                });
            }

            for sig in SIGNATURES {
                for (row, line) in block.text.lines().enumerate() {
                    if sig.regex.is_match(line) {
                        issues.push(Issue {
                            rule_id: "api/deprecated".to_string(),
                            severity: Severity::Warn,
                            message: sig.message.to_string(),
                            location: Location::Block {
                                index: block.index,
                                line: Some(block.start_line + row),
                            },
                            suggestion: Some(sig.replacement.to_string()),
                        });
                    }
                }
            }
        }

        issues
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![RuleInfo {
        id: "api/deprecated",
        severity: "warn",
        rule: "deprecated",
        message: "Reference to a deprecated module path or call signature",
        remediation: "Replace with the current API named in the finding's suggestion",
    }]
}
