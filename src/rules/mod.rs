//! Pluggable validation rules.
//!
//! Every rule implements the [`Rule`] trait: document and extracted blocks
//! in, issues out. Rules are independent of each other — the pipeline
//! isolates each one so that a failure inside a rule never affects its
//! siblings — and they only read shared data, never mutate it.
//!
//! | Rule | Module | What it checks |
//! |------|--------|----------------|
//! | `syntax` | [`syntax`] | Python blocks parse (strict, then fragment-wrapped) |
//! | `antipattern` | [`antipattern`] | Known mistake shapes in example code |
//! | `deprecated` | [`deprecated`] | References to deprecated module paths / APIs |
//! | `imports` | [`imports`] | Import paths against the allowlist manifest |
//! | `structure` | [`structure`] | Required sections in the primary guide |
//!
//! Use [`all_rules`] to obtain the registry and [`rule_catalog`] to list
//! every finding the rules can produce.

pub mod antipattern;
pub mod deprecated;
pub mod imports;
pub mod structure;
pub mod syntax;

use crate::blocks::CodeBlock;
use crate::config::Config;
use crate::document::SkillDocument;
use crate::issue::Issue;
use std::sync::LazyLock;

/// Read-only context shared by every rule in a run.
///
/// Holds the configuration tables (deprecated-API map, import manifest),
/// loaded once before any worker starts.
pub struct RuleContext<'a> {
    pub config: &'a Config,
}

/// A pluggable validation rule.
///
/// Implementers **must** be [`Send`] + [`Sync`] because
/// [`validate_document`](crate::validate::validate_document) executes rules
/// in parallel via [rayon]. Rules must treat the document and blocks as
/// read-only.
pub trait Rule: Send + Sync {
    /// Returns the rule's registry name (e.g., `"syntax"`).
    fn name(&self) -> &'static str;

    /// Returns a short, human-readable description of the rule.
    fn description(&self) -> &'static str;

    /// Runs the rule against one document and its extracted blocks.
    fn check(&self, doc: &SkillDocument, blocks: &[CodeBlock], ctx: &RuleContext) -> Vec<Issue>;
}

/// Returns every registered [`Rule`] implementation.
///
/// The returned order is the registration order; the pipeline does not
/// depend on it because rules run in parallel and issues are sorted
/// afterwards.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(syntax::SyntaxRule),
        Box::new(antipattern::AntiPatternRule),
        Box::new(deprecated::DeprecatedApiRule),
        Box::new(imports::ImportPathRule),
        Box::new(structure::StructureRule),
    ]
}

/// Metadata for a single finding a rule can produce.
///
/// Returned by [`rule_catalog`] and used by the `list-rules` and `explain`
/// CLI commands. Each rule module exposes a `rules()` function that returns
/// a `Vec<RuleInfo>`.
pub struct RuleInfo {
    /// Stable finding identifier (e.g., `"state/wrong-base-type"`).
    pub id: &'static str,
    /// Severity as a string (`"error"`, `"warn"`).
    pub severity: &'static str,
    /// Registry name of the rule that produces it.
    pub rule: &'static str,
    /// Short description of what is being flagged.
    pub message: &'static str,
    /// Guidance on how to fix a violation.
    pub remediation: &'static str,
}

/// Aggregates [`RuleInfo`] from every rule module, plus the findings the
/// loader and pipeline themselves can emit.
pub fn rule_catalog() -> Vec<RuleInfo> {
    let mut rules = Vec::new();
    rules.extend(syntax::rules());
    rules.extend(antipattern::rules());
    rules.extend(deprecated::rules());
    rules.extend(imports::rules());
    rules.extend(structure::rules());
    rules.extend(pipeline_rules());
    rules
}

/// Findings emitted outside the rule registry: loader failures, extraction
/// failures, and pipeline-level containment.
fn pipeline_rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "loader/unreadable",
            severity: "error",
            rule: "loader",
            message: "Skill document could not be read",
            remediation: "Check that the file exists, is readable, and is valid UTF-8",
        },
        RuleInfo {
            id: "loader/invalid-front-matter",
            severity: "error",
            rule: "loader",
            message: "Front matter could not be parsed as key/value metadata",
            remediation: "Fix the front-matter block: scalar `key: value` lines between --- delimiters",
        },
        RuleInfo {
            id: "structure/unterminated-block",
            severity: "error",
            rule: "extractor",
            message: "A fenced code block is never closed",
            remediation: "Close the fence with a run of the same character at least as long as the opener",
        },
        RuleInfo {
            id: "rule/internal-error",
            severity: "warn",
            rule: "pipeline",
            message: "A rule failed internally and was skipped for this document",
            remediation: "Report the failing rule; other rules' results are unaffected",
        },
        RuleInfo {
            id: "timeout",
            severity: "error",
            rule: "pipeline",
            message: "Document validation exceeded the per-document time budget",
            remediation: "Raise [validator] timeout_ms or simplify the document's examples",
        },
    ]
}

/// Marker comments declaring a block as a deliberate counter-example.
///
/// Blocks that demonstrate what *not* to do are excluded from pattern-based
/// rules so the validator does not flag the very mistakes the guide is
/// warning about.
static RE_COUNTER_EXAMPLE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)#\s*(WRONG|BAD|DON'T|INCORRECT)").unwrap());

/// Returns `true` if `code` is marked as a deliberate counter-example.
pub fn is_counter_example(code: &str) -> bool {
    RE_COUNTER_EXAMPLE.is_match(code)
}

/// One import statement extracted from a code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    /// Dotted module path (`langgraph.graph`).
    pub module: String,
    /// Imported items for `from X import a, b`; empty for `import X`.
    pub items: Vec<String>,
    /// Line within the block, 0-based.
    pub row: usize,
}

static RE_FROM_IMPORT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\s*from\s+([\w.]+)\s+import\s+(.+)$").unwrap());

static RE_PLAIN_IMPORT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^\s*import\s+([\w.]+)").unwrap());

/// Extracts `from X import a, b` and `import X` statements from `code`.
///
/// `as` aliases are stripped down to the original item name. Used by both
/// the deprecated-API and import-path rules.
pub fn extract_imports(code: &str) -> Vec<ImportRef> {
    let mut imports = Vec::new();
    for (row, line) in code.lines().enumerate() {
        if let Some(cap) = RE_FROM_IMPORT.captures(line) {
            let items = cap[2]
                .trim_end_matches(['(', '\\'])
                .split(',')
                .map(|i| i.trim().split(" as ").next().unwrap_or("").trim().to_string())
                .filter(|i| !i.is_empty())
                .collect();
            imports.push(ImportRef {
                module: cap[1].to_string(),
                items,
                row,
            });
        } else if let Some(cap) = RE_PLAIN_IMPORT.captures(line) {
            imports.push(ImportRef {
                module: cap[1].to_string(),
                items: vec![],
                row,
            });
        }
    }
    imports
}
