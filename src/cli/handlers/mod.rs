mod analysis;
mod init;
mod lookup;
mod utils;

pub use analysis::{
    handle_labels, handle_milestones, handle_report, handle_series, handle_status,
};
pub use init::handle_init;
pub use lookup::{handle_classify, handle_difficulty};

use crate::config::BurnupConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: BurnupConfig,
    pub cwd: PathBuf,
}

impl CommandContext {
    pub fn new(config: BurnupConfig, cwd: PathBuf) -> Self {
        Self { config, cwd }
    }

    /// Load the explicit config file, or discover one upward from `cwd`.
    pub fn load(config_path: Option<&Path>, cwd: PathBuf) -> Result<Self> {
        let config = match config_path {
            Some(path) => BurnupConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => BurnupConfig::discover(&cwd).context("Failed to load config")?,
        };
        Ok(Self::new(config, cwd))
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
