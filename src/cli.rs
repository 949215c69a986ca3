use clap::{Parser, Subcommand};
use skillcheck::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillcheck",
    version,
    about = "Content validation for AI assistant skill guides"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate skill content for correctness
    Validate {
        /// Skill to validate (e.g., langgraph)
        #[arg(long)]
        skill: Option<String>,

        /// Validate all discovered skills
        #[arg(long)]
        all: bool,

        /// Directory containing the skill subdirectories
        #[arg(long, default_value = "skills")]
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Treat warnings as a failing exit code
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Quick pass/fail gate over all skills — no issue detail
    Quick {
        /// Directory containing the skill subdirectories
        #[arg(long, default_value = "skills")]
        path: PathBuf,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List all built-in rules with descriptions
    ListRules,

    /// Show full explanation for a rule
    Explain {
        /// Rule ID (e.g., "state/wrong-base-type")
        rule_id: String,
    },
}
