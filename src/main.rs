mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use skillcheck::{config, output, rules, validate};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            skill,
            all,
            path,
            format,
            output: output_path,
            strict,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let skill_dirs = resolve_scope(&path, skill.as_deref(), all);

            let results = validate::validate_skills(&skill_dirs, &config);
            let formatted = output::format_results(&results, &format);

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(2);
                });
                eprintln!("Output written to {}", out_path.display());
            } else {
                print!("{formatted}");
            }

            let any_failed = results.iter().any(|r| !r.passed());
            let any_warned = results.iter().any(|r| r.warning_count() > 0);
            std::process::exit(if any_failed || (strict && any_warned) {
                1
            } else {
                0
            });
        }

        Commands::Quick {
            path,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let skill_dirs = find_skill_dirs(&path);
            if skill_dirs.is_empty() {
                eprintln!(
                    "Error: no skill directories found in '{}' (no subdirectory contains a SKILL.md)",
                    path.display()
                );
                std::process::exit(2);
            }

            match validate::quick_check(&skill_dirs, &config) {
                Some(skill) => {
                    println!("{} ({skill})", "FAIL".red().bold());
                    std::process::exit(1);
                }
                None => {
                    println!("{}", "PASS".green().bold());
                }
            }
        }

        Commands::ListRules => {
            let catalog = rules::rule_catalog();
            println!("{}", "Built-in Rules".bold().underline());
            println!();

            let mut current_rule = "";
            for info in &catalog {
                if info.rule != current_rule {
                    if !current_rule.is_empty() {
                        println!();
                    }
                    println!("  {}", info.rule.bold());
                    current_rule = info.rule;
                }

                let severity = match info.severity {
                    "error" => "ERROR".red().bold().to_string(),
                    "warn" => " WARN".yellow().bold().to_string(),
                    _ => info.severity.to_string(),
                };

                println!(
                    "    [{severity}] {id:<34} {message}",
                    id = info.id,
                    message = info.message,
                );
            }

            println!();
            println!("  Total: {} findings", catalog.len());
        }

        Commands::Explain { rule_id } => {
            let catalog = rules::rule_catalog();
            match catalog.iter().find(|r| r.id == rule_id) {
                Some(info) => {
                    println!("{}", info.id.bold());
                    println!();
                    println!("  Rule:         {}", info.rule);
                    println!("  Severity:     {}", info.severity);
                    println!("  Description:  {}", info.message);
                    println!("  Remediation:  {}", info.remediation);
                }
                None => {
                    eprintln!("Unknown rule: {rule_id}");
                    eprintln!("Use 'skillcheck list-rules' to see all available rules.");
                    std::process::exit(2);
                }
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> config::Config {
    config::Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

/// Resolves the requested scope to a list of skill directories, exiting
/// with code 2 on any invocation error before a pipeline starts.
fn resolve_scope(path: &Path, skill: Option<&str>, all: bool) -> Vec<PathBuf> {
    match (skill, all) {
        (Some(_), true) | (None, false) => {
            eprintln!("Specify exactly one of --skill NAME or --all");
            std::process::exit(2);
        }
        (Some(name), false) => {
            let dir = path.join(name);
            if !dir.join("SKILL.md").is_file() {
                eprintln!("Skill not found: {name}");
                let available = find_skill_dirs(path);
                if !available.is_empty() {
                    let names: Vec<String> = available
                        .iter()
                        .map(|p| skillcheck::document::skill_name(p))
                        .collect();
                    eprintln!("Available skills: {}", names.join(", "));
                }
                std::process::exit(2);
            }
            vec![dir]
        }
        (None, true) => {
            let dirs = find_skill_dirs(path);
            if dirs.is_empty() {
                eprintln!(
                    "Error: no skill directories found in '{}' (no subdirectory contains a SKILL.md)",
                    path.display()
                );
                std::process::exit(2);
            }
            dirs
        }
    }
}

/// Returns immediate child directories of `path` that contain a `SKILL.md`
/// file, sorted alphabetically by directory name.
fn find_skill_dirs(path: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .filter(|p| p.join("SKILL.md").is_file())
        .collect();

    dirs.sort();
    dirs
}
