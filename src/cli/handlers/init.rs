use crate::config::{BurnupConfig, CONFIG_FILE_NAME};
use crate::error::BurnupError;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn handle_init(cwd: &Path, force: bool) -> Result<()> {
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        return Err(BurnupError::AlreadyInitialized(config_path.display().to_string()).into());
    }

    BurnupConfig::default().save(&config_path)?;
    tracing::info!(path = %config_path.display(), "Wrote default config");

    println!("{} burnup config in {}", "Initialized".green(), cwd.display());
    println!("  Config: {}", config_path.display());
    Ok(())
}
