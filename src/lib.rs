//! # skillcheck
//!
//! Content validation for AI assistant skill guides.
//!
//! `skillcheck` scans a directory of skill documents (a primary `SKILL.md`
//! guide plus referenced sub-documents per skill), extracts the fenced code
//! examples embedded in them, and checks both the examples and the document
//! structure against correctness rules: Python syntax, known anti-patterns,
//! deprecated APIs, stale import paths, and missing guide sections. The
//! checks are static only — example code is never executed.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use skillcheck::{config::Config, output, validate};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let skills = vec![PathBuf::from("skills/langgraph")];
//! let results = validate::validate_skills(&skills, &config);
//!
//! let text = output::format_results(&results, &output::OutputFormat::Pretty);
//! print!("{text}");
//! std::process::exit(if results.iter().all(|r| r.passed()) { 0 } else { 1 });
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline:
//!
//! 1. **[`config`]** — TOML configuration plus the load-once lookup tables
//!    (deprecated-API map, import allowlist manifest).
//! 2. **[`document`]** — load skill documents and parse their front matter.
//! 3. **[`blocks`]** — extract fenced, line-addressed code blocks.
//! 4. **[`rules`]** — pluggable [`rules::Rule`] checks (syntax,
//!    anti-pattern, deprecated-API, import-path, structure).
//! 5. **[`validate`]** — run rules in parallel with per-rule isolation and
//!    a per-document timeout, aggregate into [`issue::ValidationResult`]s.
//! 6. **[`output`]** — render deterministic reports as pretty text, JSON,
//!    or SARIF.
//!
//! Documents are validated independently and in parallel; rules share only
//! read-only configuration, so there is no cross-document state at all.

pub mod blocks;
pub mod config;
pub mod document;
pub mod issue;
pub mod output;
pub mod rules;
pub mod validate;
