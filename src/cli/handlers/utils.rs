use crate::analytics::{
    BurnupSeries, LabelRow, MilestoneRow, Report, StatusTable, WeeklyProgress, Window,
};
use crate::cli::OutputFormat;
use crate::model::WorkflowState;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::lookup::format_number;

/// Format workflow state with color coding
pub fn format_state(state: WorkflowState) -> colored::ColoredString {
    let name = state.to_string();
    match state {
        WorkflowState::Backlog | WorkflowState::NoStatus => name.white(),
        WorkflowState::Blocked => name.red(),
        WorkflowState::Progress => name.yellow(),
        WorkflowState::Review => name.blue(),
        WorkflowState::Done => name.green(),
        WorkflowState::Duplicate | WorkflowState::Cancelled => name.dimmed(),
    }
}

/// Serialize `value` for the machine formats. Returns `false` for text,
/// which each command prints its own way.
pub fn emit<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Text => return Ok(false),
    }
    Ok(true)
}

pub fn print_no_data() {
    println!("{}", "No data for this period.".dimmed());
}

pub fn print_header(report: &Report) {
    let milestone = report.milestone.as_deref().unwrap_or("all milestones");
    println!("{} {}", "Milestone:".bold(), milestone.cyan());
    if let Some(ref iteration) = report.current_iteration {
        println!("{} {}", "Iteration:".bold(), iteration.cyan());
    }
    print_window(&report.window);
}

pub fn print_window(window: &Window) {
    println!(
        "{} {} .. {} (cutoff {})",
        "Window:".bold(),
        window.start,
        window.end,
        window.cutoff.to_string().dimmed()
    );
}

pub fn print_burnup(series: &BurnupSeries) {
    println!();
    println!("{}", "Burn-up".bold().underline());
    println!(
        "{:<12} {:>8} {:>8} {:>10}",
        "date".dimmed(),
        "scope".dimmed(),
        "done".dimmed(),
        "duplicate".dimmed()
    );
    for (i, date) in series.dates.iter().enumerate() {
        println!(
            "{:<12} {:>8} {:>8} {:>10}",
            date.to_string(),
            format_number(series.scope[i]),
            format_number(series.done[i]).green().to_string(),
            format_number(series.duplicate[i]).dimmed().to_string()
        );
    }
    println!(
        "Open at end: {}",
        format_number(series.open_scope_final).yellow()
    );
}

pub fn print_status_table(table: &StatusTable) {
    println!();
    println!(
        "{} {}",
        "Status as of".bold().underline(),
        table.cutoff.to_string().bold().underline()
    );
    for (state, cell) in &table.by_status {
        println!(
            "  {:<20} {:>5} {:>8}",
            format_state(*state).to_string(),
            cell.count,
            format_number(cell.difficulty)
        );
    }
    println!(
        "  {:<20} {:>5} {:>8}",
        "total".bold().to_string(),
        table.total.count,
        format_number(table.total.difficulty)
    );
    println!(
        "Done: {}% of items, {}% of difficulty",
        table.done_pct_count.to_string().green(),
        table.done_pct_difficulty.to_string().green()
    );
    println!(
        "Done + review: {}% of items, {}% of difficulty",
        table.done_review_pct_count.to_string().blue(),
        table.done_review_pct_difficulty.to_string().blue()
    );
}

fn print_state_columns() {
    let columns: Vec<String> = WorkflowState::WORK_COLUMNS
        .iter()
        .map(|s| format!("{:>9}", s.to_string()))
        .collect();
    println!("{:<28}{}", "", columns.join("").dimmed());
}

pub fn print_milestones(rows: &[MilestoneRow]) {
    println!();
    println!("{}", "Milestones (count / difficulty)".bold().underline());
    if rows.is_empty() {
        println!("No milestones found.");
        return;
    }
    print_state_columns();
    for row in rows {
        let cells: Vec<String> = WorkflowState::WORK_COLUMNS
            .iter()
            .map(|state| {
                let count = row.count.get(state).copied().unwrap_or(0);
                let difficulty = row.difficulty.get(state).copied().unwrap_or(0.0);
                format!("{:>9}", format!("{count}/{}", format_number(difficulty)))
            })
            .collect();
        println!(
            "{:<28}{}  {}h",
            row.name.cyan().to_string(),
            cells.join(""),
            format_number(row.total_hours())
        );
    }
}

pub fn print_labels(rows: &[LabelRow]) {
    println!();
    println!("{}", "Labels".bold().underline());
    if rows.is_empty() {
        println!("No labels found.");
        return;
    }
    print_state_columns();
    for row in rows {
        let cells: Vec<String> = WorkflowState::WORK_COLUMNS
            .iter()
            .map(|state| format!("{:>9}", row.counts.get(state).copied().unwrap_or(0)))
            .collect();
        println!(
            "{:<28}{}  {}",
            row.label.yellow().to_string(),
            cells.join(""),
            row.total.to_string().bold()
        );
    }
}

pub fn print_weekly(weekly: &WeeklyProgress) {
    println!();
    println!("{} {}", "Week".bold().underline(), weekly.week.to_string().bold());
    println!(
        "Closed this week:     {} items, {} difficulty",
        weekly.closed_this_week.count.to_string().green(),
        format_number(weekly.closed_this_week.difficulty)
    );
    println!(
        "Closed previous week: {} items, {} difficulty",
        weekly.closed_previous_week.count,
        format_number(weekly.closed_previous_week.difficulty)
    );
}
