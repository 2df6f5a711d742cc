use thiserror::Error;

#[derive(Error, Debug)]
pub enum BurnupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid week id: {0} (expected YYYY-Www)")]
    InvalidWeek(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML render error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Config already exists at {0}")]
    AlreadyInitialized(String),
}

pub type Result<T> = std::result::Result<T, BurnupError>;
