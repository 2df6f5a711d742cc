pub mod commands;
pub mod handlers;

pub use commands::{AnalysisArgs, Cli, Commands, OutputFormat};
