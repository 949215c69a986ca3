//! Known-mistake detection in example code.
//!
//! A fixed library of matchers, each recognizing one incorrect code shape.
//! Matchers run over the **concatenation of all analyzable blocks** in block
//! order, because some mistakes only manifest across examples (a state type
//! declared in one block, a conflicting usage in a later one). A line map
//! translates concatenation positions back to `(block, absolute line)`.
//!
//! A block is excluded from analysis when it is Python-tagged but fails even
//! the fragment-wrapped parse, or when it is marked as a deliberate
//! counter-example (`# WRONG`, `# BAD`, ...) — guides often show the mistake
//! right before the correction, and those blocks must not be flagged.
//!
//! Simple shapes are regex matchers in a static table; `node/bad-return-shape`
//! and `tool/missing-docstring` inspect tree-sitter parse trees instead,
//! since return-value and docstring shapes do not regex well. Severity is a
//! property of the rule, never of the call site.

use crate::blocks::CodeBlock;
use crate::document::SkillDocument;
use crate::issue::{Issue, Location, Severity};
use crate::rules::{is_counter_example, Rule, RuleContext, RuleInfo};
use crate::rules::syntax::{is_parseable, is_python_tag};
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::{Node, Parser};

// ---------------------------------------------------------------------------
// Static regexes
// ---------------------------------------------------------------------------

static RE_BASE_MODEL_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+\w+\s*\(\s*BaseModel\s*\)\s*:").unwrap());

/// Graph/state vocabulary that must accompany a BaseModel finding; a plain
/// validation model unrelated to graph state is legitimate.
static RE_STATE_CONTEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(state|graph|langgraph)\b").unwrap());

static RE_STATE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)class\s+\w+\s*\(\s*[^)]*(TypedDict|State)[^)]*\)\s*:").unwrap()
});

static RE_LIST_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\w+\s*:\s*(list|List)\[").unwrap());

static RE_ANNOTATED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bAnnotated\[").unwrap());

static RE_INTERRUPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binterrupt\s*\(").unwrap());

/// A compile/build call that supplies a persistence handle.
static RE_CHECKPOINTER_SUPPLIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\.compile|create_react_agent)\s*\([^)]*checkpointer\s*=").unwrap()
});

static RE_RECURSION_LIMIT_NESTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']configurable["']\s*:\s*\{[^}]*["']recursion_limit["']"#).unwrap()
});

static RE_TOOL_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bToolMessage\s*\(").unwrap());

static RE_TOOL_CALL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btool_call_id\s*=").unwrap());

static RE_FAISS_LOAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bFAISS\.load_local\s*\(").unwrap());

static RE_DANGEROUS_DESER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"allow_dangerous_deserialization\s*=\s*True").unwrap());

static RE_SPLITTER_CHUNK_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"RecursiveCharacterTextSplitter\s*\([^)]*chunk_size").unwrap()
});

static RE_CHUNK_OVERLAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bchunk_overlap\b").unwrap());

static RE_PLACEHOLDER_TODO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*(TODO|FIXME|XXX|HACK)").unwrap());

static RE_ELLIPSIS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\.\.\.\s*$").unwrap());

static RE_PASS_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*pass\s*#").unwrap());

// ---------------------------------------------------------------------------
// Matcher table
// ---------------------------------------------------------------------------

/// How far a negative pattern reaches when deciding whether a match is a
/// real finding.
enum NegativeScope {
    /// The n lines starting at the matching line (call windows).
    Window(usize),
    /// Anywhere in the concatenated document.
    Document,
}

struct PatternRule {
    id: &'static str,
    severity: Severity,
    regex: &'static LazyLock<Regex>,
    /// Must match somewhere in the document for the finding to apply.
    context: Option<&'static LazyLock<Regex>>,
    /// Suppresses the finding when present in `scope`.
    negative: Option<(&'static LazyLock<Regex>, NegativeScope)>,
    message: &'static str,
    suggestion: Option<&'static str>,
}

static PATTERNS: &[PatternRule] = &[
    PatternRule {
        id: "state/wrong-base-type",
        severity: Severity::Error,
        regex: &RE_BASE_MODEL_CLASS,
        context: Some(&RE_STATE_CONTEXT),
        negative: None,
        message: "Graph state must be declared as a plain TypedDict, not a Pydantic BaseModel",
        suggestion: Some("Change to: class State(TypedDict):"),
    },
    PatternRule {
        id: "hitl/missing-checkpointer",
        severity: Severity::Error,
        regex: &RE_INTERRUPT,
        context: None,
        negative: Some((&RE_CHECKPOINTER_SUPPLIED, NegativeScope::Document)),
        message: "interrupt() requires a checkpointer; no compile call in this document supplies one",
        suggestion: Some("Use: graph.compile(checkpointer=InMemorySaver())"),
    },
    PatternRule {
        id: "config/recursion-limit-misplaced",
        severity: Severity::Error,
        regex: &RE_RECURSION_LIMIT_NESTED,
        context: None,
        negative: None,
        message: "recursion_limit is a top-level invocation option, not a configurable key",
        suggestion: Some(r#"Use: graph.invoke(inputs, {"recursion_limit": 50})"#),
    },
    PatternRule {
        id: "tool/missing-call-id",
        severity: Severity::Error,
        regex: &RE_TOOL_MESSAGE,
        context: None,
        negative: Some((&RE_TOOL_CALL_ID, NegativeScope::Window(8))),
        message: "ToolMessage constructed without the originating call's tool_call_id",
        suggestion: Some(r#"Pass tool_call_id=tool_call["id"] from the request being answered"#),
    },
    PatternRule {
        id: "rag/faiss-deserialization",
        severity: Severity::Error,
        regex: &RE_FAISS_LOAD,
        context: None,
        negative: Some((&RE_DANGEROUS_DESER, NegativeScope::Window(5))),
        message: "FAISS.load_local requires allow_dangerous_deserialization=True",
        suggestion: Some("Add: allow_dangerous_deserialization=True"),
    },
    PatternRule {
        id: "rag/missing-chunk-overlap",
        severity: Severity::Warn,
        regex: &RE_SPLITTER_CHUNK_SIZE,
        context: None,
        negative: Some((&RE_CHUNK_OVERLAP, NegativeScope::Window(5))),
        message: "Text splitter sets chunk_size without chunk_overlap; adjacent chunks lose context",
        suggestion: Some("Add: chunk_overlap=200"),
    },
    PatternRule {
        id: "code/placeholder-todo",
        severity: Severity::Warn,
        regex: &RE_PLACEHOLDER_TODO,
        context: None,
        negative: None,
        message: "Example contains a TODO/FIXME placeholder",
        suggestion: None,
    },
    PatternRule {
        id: "code/ellipsis-placeholder",
        severity: Severity::Warn,
        regex: &RE_ELLIPSIS_LINE,
        context: None,
        negative: None,
        message: "Example contains a bare ... placeholder; examples should be complete",
        suggestion: None,
    },
    PatternRule {
        id: "code/pass-placeholder",
        severity: Severity::Warn,
        regex: &RE_PASS_PLACEHOLDER,
        context: None,
        negative: None,
        message: "Example contains `pass` with a comment; likely an unfinished placeholder",
        suggestion: None,
    },
];

// ---------------------------------------------------------------------------
// Concatenated document source
// ---------------------------------------------------------------------------

/// All analyzable block content joined in block order, with a map from
/// concatenation line index back to `(block index, absolute source line)`.
struct DocSource {
    text: String,
    line_map: Vec<(usize, usize)>,
}

fn build_source(blocks: &[CodeBlock]) -> DocSource {
    let mut text = String::new();
    let mut line_map = Vec::new();

    for block in blocks {
        if is_counter_example(&block.text) {
            continue;
        }
        if is_python_tag(&block.language) && !is_parseable(&block.text) {
            continue;
        }
        for (row, line) in block.text.lines().enumerate() {
            text.push_str(line);
            text.push('\n');
            line_map.push((block.index, block.start_line + row));
        }
    }

    DocSource { text, line_map }
}

impl DocSource {
    fn location(&self, byte_offset: usize) -> Option<Location> {
        let line_idx = self.text[..byte_offset]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        let (index, line) = *self.line_map.get(line_idx)?;
        Some(Location::Block {
            index,
            line: Some(line),
        })
    }

    fn window(&self, lines: &[&str], byte_offset: usize, len: usize) -> String {
        let line_idx = self.text[..byte_offset]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        let end = (line_idx + len).min(lines.len());
        lines[line_idx..end].join("\n")
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

pub struct AntiPatternRule;

impl Rule for AntiPatternRule {
    fn name(&self) -> &'static str {
        "antipattern"
    }

    fn description(&self) -> &'static str {
        "Known-incorrect code shapes (state typing, HITL, config, tools, RAG)"
    }

    fn check(&self, _doc: &SkillDocument, blocks: &[CodeBlock], _ctx: &RuleContext) -> Vec<Issue> {
        let source = build_source(blocks);
        let lines: Vec<&str> = source.text.lines().collect();
        let mut issues = Vec::new();

        for rule in PATTERNS {
            if let Some(context) = rule.context {
                if !context.is_match(&source.text) {
                    continue;
                }
            }

            for m in rule.regex.find_iter(&source.text) {
                if let Some((negative, scope)) = &rule.negative {
                    let suppressed = match scope {
                        NegativeScope::Window(len) => {
                            negative.is_match(&source.window(&lines, m.start(), *len))
                        }
                        NegativeScope::Document => negative.is_match(&source.text),
                    };
                    if suppressed {
                        continue;
                    }
                }

                let Some(location) = source.location(m.start()) else {
                    continue;
                };
                issues.push(Issue {
                    rule_id: rule.id.to_string(),
                    severity: rule.severity.clone(),
                    message: rule.message.to_string(),
                    location,
                    suggestion: rule.suggestion.map(str::to_string),
                });
            }
        }

        check_missing_reducer(&source, &lines, &mut issues);

        for block in blocks {
            if !is_python_tag(&block.language) || is_counter_example(&block.text) {
                continue;
            }
            // Blocks the syntax rule already rejects are not analyzed here.
            if !is_parseable(&block.text) {
                continue;
            }
            check_block_structure(block, &mut issues);
        }

        issues
    }
}

/// `state/missing-reducer`: a list-typed field in a state class body without
/// an `Annotated[...]` reducer annotation.
///
/// Tracks state-class bodies by indentation so that list-typed function
/// parameters and unrelated locals are not flagged.
fn check_missing_reducer(source: &DocSource, lines: &[&str], issues: &mut Vec<Issue>) {
    let mut class_indent: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        if let Some(cap) = RE_STATE_CLASS.captures(line) {
            class_indent = Some(cap[1].len());
            continue;
        }

        if let Some(indent) = class_indent {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let line_indent = line.len() - line.trim_start().len();
            if line_indent <= indent {
                // Dedent ends the class body.
                class_indent = None;
                continue;
            }
            if RE_LIST_FIELD.is_match(line) && !RE_ANNOTATED.is_match(line) {
                let (index, abs_line) = source.line_map[idx];
                issues.push(Issue {
                    rule_id: "state/missing-reducer".to_string(),
                    severity: Severity::Error,
                    message: "List-typed state field has no reducer; updates will replace instead of merge"
                        .to_string(),
                    location: Location::Block {
                        index,
                        line: Some(abs_line),
                    },
                    suggestion: Some(
                        "Use: messages: Annotated[list[AnyMessage], add_messages]".to_string(),
                    ),
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Structural matchers (tree-sitter)
// ---------------------------------------------------------------------------

/// Return-expression kinds that are bare values rather than state mappings.
const BARE_RETURN_KINDS: &[&str] = &[
    "string",
    "concatenated_string",
    "list",
    "tuple",
    "set",
    "integer",
    "float",
];

fn check_block_structure(block: &CodeBlock, issues: &mut Vec<Issue>) {
    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .is_err()
    {
        return;
    }
    let Some(tree) = parser.parse(&block.text, None) else {
        return;
    };
    let src = block.text.as_bytes();
    let last_content = block.end_line.saturating_sub(1).max(block.start_line);
    let abs = |row: usize| (block.start_line + row).min(last_content);

    let mut functions = Vec::new();
    collect_kind(tree.root_node(), "function_definition", &mut functions);

    for func in &functions {
        // node/bad-return-shape: a state-taking step function must return a
        // mapping of field names to values.
        let takes_state = func
            .child_by_field_name("parameters")
            .and_then(|p| p.utf8_text(src).ok())
            .is_some_and(|p| p.contains("state"));
        if takes_state {
            let mut returns = Vec::new();
            collect_returns(*func, &mut returns);
            for ret in &returns {
                let Some(value) = ret.named_child(0) else {
                    continue;
                };
                if BARE_RETURN_KINDS.contains(&value.kind()) {
                    issues.push(Issue {
                        rule_id: "node/bad-return-shape".to_string(),
                        severity: Severity::Error,
                        message: format!(
                            "Step function returns a bare {}; graph steps must return a dict of state updates",
                            value.kind().replace('_', " "),
                        ),
                        location: Location::Block {
                            index: block.index,
                            line: Some(abs(ret.start_position().row)),
                        },
                        suggestion: Some(
                            r#"Return a mapping, e.g. {"messages": [response]}"#.to_string(),
                        ),
                    });
                }
            }
        }
    }

    let mut decorated = Vec::new();
    collect_kind(tree.root_node(), "decorated_definition", &mut decorated);

    for node in &decorated {
        if !has_tool_decorator(*node, src) {
            continue;
        }
        let Some(func) = node.child_by_field_name("definition") else {
            continue;
        };
        if func.kind() != "function_definition" {
            continue;
        }
        if !has_docstring(func) {
            issues.push(Issue {
                rule_id: "tool/missing-docstring".to_string(),
                severity: Severity::Warn,
                message: "Tool function has no docstring; the model relies on it to decide when to call the tool"
                    .to_string(),
                location: Location::Block {
                    index: block.index,
                    line: Some(abs(func.start_position().row)),
                },
                suggestion: Some(
                    "Add a docstring describing what the tool does and when to use it".to_string(),
                ),
            });
        }
    }
}

fn collect_kind<'a>(node: Node<'a>, kind: &str, out: &mut Vec<Node<'a>>) {
    if node.kind() == kind {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_kind(child, kind, out);
    }
}

/// Return statements belonging to `node` itself, not to nested functions.
fn collect_returns<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "function_definition" {
            continue;
        }
        if child.kind() == "return_statement" {
            out.push(child);
        }
        collect_returns(child, out);
    }
}

fn has_tool_decorator(decorated: Node, src: &[u8]) -> bool {
    let mut cursor = decorated.walk();
    for child in decorated.children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        let Ok(text) = child.utf8_text(src) else {
            continue;
        };
        let name = text
            .trim_start_matches('@')
            .split('(')
            .next()
            .unwrap_or("")
            .trim();
        if name == "tool" || name.ends_with(".tool") {
            return true;
        }
    }
    false
}

/// A docstring is a leading expression statement holding a string literal.
fn has_docstring(func: Node) -> bool {
    let Some(body) = func.child_by_field_name("body") else {
        return false;
    };
    let Some(first) = body.named_child(0) else {
        return false;
    };
    first.kind() == "expression_statement"
        && first
            .named_child(0)
            .is_some_and(|inner| inner.kind() == "string")
}

pub fn rules() -> Vec<RuleInfo> {
    let mut infos: Vec<RuleInfo> = PATTERNS
        .iter()
        .map(|p| RuleInfo {
            id: p.id,
            severity: match p.severity {
                Severity::Error => "error",
                Severity::Warn => "warn",
            },
            rule: "antipattern",
            message: p.message,
            remediation: p.suggestion.unwrap_or("See the skill guide's critical rules"),
        })
        .collect();

    infos.push(RuleInfo {
        id: "state/missing-reducer",
        severity: "error",
        rule: "antipattern",
        message: "List-typed state field declared without a reducer annotation",
        remediation: "Use: messages: Annotated[list[AnyMessage], add_messages]",
    });
    infos.push(RuleInfo {
        id: "node/bad-return-shape",
        severity: "error",
        rule: "antipattern",
        message: "Graph step function returns a bare value instead of a state-update mapping",
        remediation: r#"Return a mapping of field names to values, e.g. {"messages": [response]}"#,
    });
    infos.push(RuleInfo {
        id: "tool/missing-docstring",
        severity: "warn",
        rule: "antipattern",
        message: "Tool-defining function lacks a descriptive docstring",
        remediation: "Add a docstring describing what the tool does and when to use it",
    });
    infos
}
