//! Skill document loading.
//!
//! A skill is a directory holding a primary guide (`SKILL.md`) and zero or
//! more reference documents linked from it. [`load_skill`] reads the primary
//! guide first, then every referenced sub-document, returning one entry per
//! file. A file that cannot be read, or whose front matter does not parse,
//! produces a [`LoadError`] entry — sibling documents are unaffected.
//!
//! # Front matter
//!
//! A lightweight YAML subset parser is used instead of a full YAML crate.
//! Guide front matter is scalar `key: value` pairs between `---` delimiters,
//! which is all the skill format declares. A file that does not open with
//! `---` simply has no front matter (common for reference documents).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// One guide file, parsed and ready for rule execution.
///
/// Immutable once constructed. `body` is the complete file text, so every
/// line number downstream is a 1-based line of the on-disk file.
#[derive(Debug, Clone)]
pub struct SkillDocument {
    pub path: PathBuf,
    pub skill: String,
    pub front_matter: BTreeMap<String, String>,
    pub body: String,
    /// `true` for the skill's primary guide (`SKILL.md`), `false` for
    /// referenced sub-documents.
    pub primary: bool,
}

/// Failure to load one document.
///
/// Fatal to that document only: the caller records it as a single
/// document-level error issue and skips rule execution for the file.
#[derive(Debug, Clone)]
pub struct LoadError {
    pub path: PathBuf,
    pub skill: String,
    /// `"loader/unreadable"` or `"loader/invalid-front-matter"`.
    pub rule_id: &'static str,
    pub message: String,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Relative markdown link target ending in `.md`, e.g. `[api](reference.md)`.
static RE_MD_LINK: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\[[^\]]*\]\(([^()\s]+?\.md)\)").unwrap());

/// Loads a skill's primary guide plus every referenced sub-document.
///
/// The primary guide is always the first entry. Sub-documents are the
/// relative `.md` link targets found in the primary body, resolved inside
/// the skill directory, deduplicated, in first-mention order. URLs, absolute
/// paths, and paths escaping the skill directory are ignored.
pub fn load_skill(skill_dir: &Path) -> Vec<Result<SkillDocument, LoadError>> {
    let skill = skill_name(skill_dir);
    let primary_path = skill_dir.join("SKILL.md");

    let mut docs = Vec::new();
    let primary = load_document(&primary_path, &skill, true);

    let referenced: Vec<PathBuf> = match &primary {
        Ok(doc) => referenced_paths(skill_dir, &doc.body),
        Err(_) => vec![],
    };
    docs.push(primary);

    for path in referenced {
        docs.push(load_document(&path, &skill, false));
    }

    docs
}

/// Reads and parses a single document file.
pub fn load_document(
    path: &Path,
    skill: &str,
    primary: bool,
) -> Result<SkillDocument, LoadError> {
    let body = std::fs::read_to_string(path).map_err(|e| LoadError {
        path: path.to_path_buf(),
        skill: skill.to_string(),
        rule_id: "loader/unreadable",
        message: format!("could not read file: {e}"),
    })?;

    let front_matter = parse_front_matter(&body).map_err(|msg| LoadError {
        path: path.to_path_buf(),
        skill: skill.to_string(),
        rule_id: "loader/invalid-front-matter",
        message: msg,
    })?;

    Ok(SkillDocument {
        path: path.to_path_buf(),
        skill: skill.to_string(),
        front_matter,
        body,
        primary,
    })
}

/// Extracts the skill name from a directory path.
///
/// Returns the last path component or `"unknown"` when the path has no
/// file-name segment (e.g., `/`).
pub fn skill_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Resolves relative `.md` link targets from `body` against `skill_dir`.
///
/// Only existing files inside the skill directory are returned; the primary
/// guide itself is never re-listed.
fn referenced_paths(skill_dir: &Path, body: &str) -> Vec<PathBuf> {
    let mut seen = Vec::new();
    for cap in RE_MD_LINK.captures_iter(body) {
        let target = &cap[1];
        if target.contains("://") || target.starts_with('/') || target.starts_with("..") {
            continue;
        }
        if target == "SKILL.md" {
            continue;
        }
        let path = skill_dir.join(target);
        if path.is_file() && !seen.contains(&path) {
            seen.push(path);
        }
    }
    seen
}

/// Parses the front-matter block, if any, into a key/value map.
///
/// Returns an empty map when the file does not open with `---`. Inside the
/// block, blank lines and `#` comments are skipped; any other line that is
/// not `key: value` is an error, as is a missing closing delimiter.
fn parse_front_matter(content: &str) -> Result<BTreeMap<String, String>, String> {
    let mut map = BTreeMap::new();

    let mut lines = content.lines();
    match lines.next() {
        Some(first) if first.trim() == "---" => {}
        _ => return Ok(map),
    }

    let mut closed = false;
    for (idx, line) in lines.enumerate() {
        let line_num = idx + 2; // 1-based, after the opening delimiter
        if line.trim() == "---" {
            closed = true;
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_kv(line) {
            Some((key, value)) => {
                map.insert(key, value.trim().to_string());
            }
            None => {
                return Err(format!(
                    "front matter line {line_num} is not a key/value pair: {trimmed}"
                ));
            }
        }
    }

    if !closed {
        return Err("front matter block is never closed (missing '---')".to_string());
    }

    Ok(map)
}

/// Split a YAML `key: value` line into `(key, value)`.
///
/// Only top-level keys (no leading whitespace) are recognised. The value is
/// everything after the first `: ` (or `:` at end-of-line).
fn parse_kv(line: &str) -> Option<(String, String)> {
    if line.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim().to_string();
    if key.is_empty() {
        return None;
    }
    let after = &line[colon_pos + 1..];
    let value = after.strip_prefix(' ').unwrap_or(after);
    Some((key, value.to_string()))
}
