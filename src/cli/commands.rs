use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "burnup")]
#[command(
    author,
    version,
    about = "Burn-up series, status snapshots and cross-tabs from project-tracker exports"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .burnup.toml by default)
    #[arg(long, global = true, env = "BURNUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .burnup.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Full report: window, burn-up, status table and cross-tabs
    #[command(visible_alias = "r")]
    Report(AnalysisArgs),

    /// Burn-up series only
    Series(AnalysisArgs),

    /// Status table as of the cutoff date
    Status(AnalysisArgs),

    /// Milestone cross-tab (ignores --milestone)
    Milestones(AnalysisArgs),

    /// Label cross-tab
    Labels(AnalysisArgs),

    /// Show the workflow state a status text maps to
    Classify {
        /// Status text, e.g. "Em andamento"
        status: String,
    },

    /// Show the weight a difficulty label maps to
    Difficulty {
        /// Difficulty label, e.g. "P2" or "3,5"
        label: String,
    },
}

/// Options shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// JSON file with an array of exported items
    pub input: PathBuf,

    /// Only items whose milestone contains this name (accent-insensitive)
    #[arg(short, long, conflicts_with = "latest_milestone")]
    pub milestone: Option<String>,

    /// Use the milestone whose work reaches furthest into the future
    #[arg(long)]
    pub latest_milestone: bool,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(short, long, conflicts_with = "week")]
    pub date: Option<String>,

    /// Report on an ISO week (YYYY-Www); the cutoff is its Sunday
    #[arg(short, long)]
    pub week: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}
