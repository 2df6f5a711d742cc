use crate::normalize::{classify_status, map_difficulty, normalize_text};
use anyhow::Result;
use colored::Colorize;

use super::utils::format_state;

pub fn handle_classify(status: &str) -> Result<()> {
    let state = classify_status(status);
    println!(
        "{} -> {} ({})",
        status.bold(),
        format_state(state),
        normalize_text(status).dimmed()
    );
    Ok(())
}

pub fn handle_difficulty(label: &str) -> Result<()> {
    println!("{} -> {}", label.bold(), format_number(map_difficulty(Some(label))).cyan());
    Ok(())
}

pub(super) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
