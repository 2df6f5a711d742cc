use crate::error::{BurnupError, Result};
use crate::source::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".burnup.toml";

/// Upper bound for `analytics.window_fallback_days` (about a century).
pub const MAX_WINDOW_FALLBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BurnupConfig {
    #[serde(default)]
    pub fields: FieldNames,

    #[serde(default)]
    pub analytics: AnalyticsSettings,

    #[serde(default)]
    pub retry: RetrySettings,
}

/// Names of the tracker's custom fields, matched case- and
/// accent-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_status_field")]
    pub status: String,

    #[serde(default = "default_iteration_field")]
    pub iteration: String,

    #[serde(default = "default_milestone_field")]
    pub milestone: String,

    #[serde(default = "default_difficulty_field")]
    pub difficulty: String,

    #[serde(default = "default_estimate_field")]
    pub estimate: String,
}

fn default_status_field() -> String {
    "Status".to_string()
}

fn default_iteration_field() -> String {
    "Iteration".to_string()
}

fn default_milestone_field() -> String {
    "Milestone".to_string()
}

fn default_difficulty_field() -> String {
    "Dificuldade".to_string()
}

fn default_estimate_field() -> String {
    "Estimate (Hours)".to_string()
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            status: default_status_field(),
            iteration: default_iteration_field(),
            milestone: default_milestone_field(),
            difficulty: default_difficulty_field(),
            estimate: default_estimate_field(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Rows kept in the label cross-tab.
    #[serde(default = "default_top_labels")]
    pub top_labels: usize,

    /// Label reserved for internal tooling; never reported.
    #[serde(default = "default_excluded_label")]
    pub excluded_label: String,

    /// Burn-up length when no usable start date exists.
    #[serde(default = "default_window_fallback_days")]
    pub window_fallback_days: i64,
}

fn default_top_labels() -> usize {
    15
}

fn default_excluded_label() -> String {
    "report-ignore".to_string()
}

fn default_window_fallback_days() -> i64 {
    30
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            top_labels: default_top_labels(),
            excluded_label: default_excluded_label(),
            window_fallback_days: default_window_fallback_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl BurnupConfig {
    /// Load the nearest `.burnup.toml` above `start_path`, or defaults when
    /// there is none.
    pub fn discover(start_path: &Path) -> Result<Self> {
        match Self::find_config_file(start_path) {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!(start = %start_path.display(), "No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BurnupError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: BurnupConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.analytics.top_labels == 0 {
            return Err(BurnupError::Config(
                "analytics.top_labels must be at least 1".to_string(),
            ));
        }
        if self.analytics.window_fallback_days < 0 {
            return Err(BurnupError::Config(
                "analytics.window_fallback_days cannot be negative".to_string(),
            ));
        }
        if self.analytics.window_fallback_days > MAX_WINDOW_FALLBACK_DAYS {
            return Err(BurnupError::Config(format!(
                "analytics.window_fallback_days cannot exceed {}",
                MAX_WINDOW_FALLBACK_DAYS
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(BurnupError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
