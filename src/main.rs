use anyhow::{Context, Result};
use clap::Parser;

use burnup::cli::handlers::{
    CommandContext, handle_classify, handle_difficulty, handle_init, handle_labels,
    handle_milestones, handle_report, handle_series, handle_status,
};
use burnup::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    burnup::logging::init(cli.verbose, cli.log_file.clone());

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let context = || CommandContext::load(cli.config.as_deref(), cwd.clone());

    match cli.command {
        Commands::Init { force } => handle_init(&cwd, force),
        Commands::Report(args) => handle_report(&context()?, args),
        Commands::Series(args) => handle_series(&context()?, args),
        Commands::Status(args) => handle_status(&context()?, args),
        Commands::Milestones(args) => handle_milestones(&context()?, args),
        Commands::Labels(args) => handle_labels(&context()?, args),
        Commands::Classify { status } => handle_classify(&status),
        Commands::Difficulty { label } => handle_difficulty(&label),
    }
}
