//! Import-path verification against the allowlist manifest.
//!
//! Only modules under the manifest's namespace roots are examined; stdlib
//! and unrelated third-party imports are not the validator's business. All
//! findings here are warnings, never errors: the manifest may lag upstream
//! releases, and a false positive must not fail a build outright.

use crate::blocks::CodeBlock;
use crate::document::SkillDocument;
use crate::issue::{Issue, Location, Severity};
use crate::rules::{extract_imports, Rule, RuleContext, RuleInfo};

pub struct ImportPathRule;

impl Rule for ImportPathRule {
    fn name(&self) -> &'static str {
        "imports"
    }

    fn description(&self) -> &'static str {
        "Referenced module paths must appear in the allowlist manifest"
    }

    fn check(&self, _doc: &SkillDocument, blocks: &[CodeBlock], ctx: &RuleContext) -> Vec<Issue> {
        let roots = ctx.config.manifest_roots();
        let mut issues = Vec::new();

        for block in blocks {
            for import in extract_imports(&block.text) {
                let root = import.module.split('.').next().unwrap_or("");
                if !roots.contains(&root) {
                    continue;
                }
                // Deprecated paths are the deprecated rule's finding; a
                // second report here would be noise.
                if ctx.config.deprecated_replacement(&import.module).is_some() {
                    continue;
                }

                let location = Location::Block {
                    index: block.index,
                    line: Some(block.start_line + import.row),
                };

                match ctx.config.manifest_items(&import.module) {
                    None => {
                        issues.push(Issue {
                            rule_id: "import/unknown-path".to_string(),
                            severity: Severity::Warn,
                            message: format!("Unknown module path: {}", import.module),
                            location,
                            suggestion: Some(
                                "Verify the module against the current release; the manifest may need updating"
                                    .to_string(),
                            ),
                        });
                    }
                    Some(valid) => {
                        for item in &import.items {
                            if item == "*" || valid.contains(&item.as_str()) {
                                continue;
                            }
                            let mut preview: Vec<&str> = valid.iter().take(5).copied().collect();
                            let truncated = valid.len() > preview.len();
                            if truncated {
                                preview.push("...");
                            }
                            issues.push(Issue {
                                rule_id: "import/unknown-item".to_string(),
                                severity: Severity::Warn,
                                message: format!(
                                    "Unknown import: {} from {}",
                                    item, import.module
                                ),
                                location: location.clone(),
                                suggestion: Some(format!(
                                    "Valid imports from {}: {}",
                                    import.module,
                                    preview.join(", ")
                                )),
                            });
                        }
                    }
                }
            }
        }

        issues
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "import/unknown-path",
            severity: "warn",
            rule: "imports",
            message: "Module path is not in the allowlist manifest",
            remediation: "Check the path against the current release, or extend [imports.allowed]",
        },
        RuleInfo {
            id: "import/unknown-item",
            severity: "warn",
            rule: "imports",
            message: "Imported item is not exported by the manifest module",
            remediation: "Check the item name, or extend [imports.allowed] for the module",
        },
    ]
}
