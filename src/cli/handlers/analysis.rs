use crate::analytics::{
    AnalysisOutcome, AnalysisParams, Report, WeekRange, analyze, build_milestone_table,
};
use crate::classify::latest_milestone;
use crate::cli::AnalysisArgs;
use crate::model::{ProjectItem, convert_all};
use crate::source::{JsonFileSource, RetryState, fetch_with_retry};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;

use super::CommandContext;
use super::utils::{
    emit, print_burnup, print_header, print_labels, print_milestones, print_no_data,
    print_status_table, print_weekly, print_window,
};

/// Read and normalize the items behind an analysis command.
pub fn load_items(ctx: &CommandContext, args: &AnalysisArgs) -> Result<Vec<ProjectItem>> {
    let path = ctx.resolve(&args.input);
    let mut source = JsonFileSource::new(&path);
    let (raw, _state) = fetch_with_retry(
        &mut source,
        &ctx.config.retry.policy(),
        RetryState::default(),
        std::thread::sleep,
    );
    let raw = raw.with_context(|| format!("Failed to read items from {}", path.display()))?;
    Ok(convert_all(raw, &ctx.config.fields, Utc::now()).items)
}

/// Turn command-line options into analysis parameters.
pub fn build_params(
    ctx: &CommandContext,
    args: &AnalysisArgs,
    items: &[ProjectItem],
) -> Result<AnalysisParams> {
    let reference_date = match args.date.as_deref() {
        Some(date) => NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid --date '{}', expected YYYY-MM-DD", date))?,
        None => Local::now().date_naive(),
    };

    let week = args
        .week
        .as_deref()
        .map(|id| id.parse::<WeekRange>())
        .transpose()?;

    let milestone = if args.latest_milestone {
        let detected = latest_milestone(items);
        match detected {
            Some(ref name) => tracing::info!(milestone = %name, "Detected latest milestone"),
            None => tracing::warn!("No milestone found, reporting on all items"),
        }
        detected
    } else {
        args.milestone.clone()
    };

    Ok(AnalysisParams::new(reference_date)
        .with_milestone(milestone)
        .with_week(week)
        .with_settings(ctx.config.analytics.clone()))
}

fn run(ctx: &CommandContext, args: &AnalysisArgs) -> Result<Option<Report>> {
    let items = load_items(ctx, args)?;
    let params = build_params(ctx, args, &items)?;
    match analyze(&items, &params) {
        AnalysisOutcome::Ready(report) => Ok(Some(*report)),
        AnalysisOutcome::NoEligibleItems => {
            if !emit(&serde_json::Value::Null, args.format)? {
                print_no_data();
            }
            Ok(None)
        }
    }
}

/// Emit `section` in a machine format, or fall through to `print_text`.
fn output<T: Serialize>(args: &AnalysisArgs, section: &T, print_text: impl FnOnce()) -> Result<()> {
    if !emit(section, args.format)? {
        print_text();
    }
    Ok(())
}

pub fn handle_report(ctx: &CommandContext, args: AnalysisArgs) -> Result<()> {
    let Some(report) = run(ctx, &args)? else {
        return Ok(());
    };
    output(&args, &report, || {
        print_header(&report);
        print_burnup(&report.burnup);
        print_status_table(&report.status);
        if let Some(ref weekly) = report.weekly {
            print_weekly(weekly);
        }
        print_milestones(&report.milestones);
        print_labels(&report.labels);
    })
}

#[derive(Serialize)]
struct SeriesOutput<'a> {
    window: &'a crate::analytics::Window,
    burnup: &'a crate::analytics::BurnupSeries,
}

pub fn handle_series(ctx: &CommandContext, args: AnalysisArgs) -> Result<()> {
    let Some(report) = run(ctx, &args)? else {
        return Ok(());
    };
    let section = SeriesOutput {
        window: &report.window,
        burnup: &report.burnup,
    };
    output(&args, &section, || {
        print_window(&report.window);
        print_burnup(&report.burnup);
    })
}

pub fn handle_status(ctx: &CommandContext, args: AnalysisArgs) -> Result<()> {
    let Some(report) = run(ctx, &args)? else {
        return Ok(());
    };
    output(&args, &report.status, || {
        print_status_table(&report.status);
        if let Some(ref weekly) = report.weekly {
            print_weekly(weekly);
        }
    })
}

/// The milestone cross-tab covers every tracked item, so it is built
/// regardless of `--milestone` or the reference date.
pub fn handle_milestones(ctx: &CommandContext, args: AnalysisArgs) -> Result<()> {
    let items = load_items(ctx, &args)?;
    let milestones = build_milestone_table(&items);
    if milestones.is_empty() {
        if !emit(&serde_json::Value::Null, args.format)? {
            print_no_data();
        }
        return Ok(());
    }
    output(&args, &milestones, || print_milestones(&milestones))
}

pub fn handle_labels(ctx: &CommandContext, args: AnalysisArgs) -> Result<()> {
    let Some(report) = run(ctx, &args)? else {
        return Ok(());
    };
    output(&args, &report.labels, || print_labels(&report.labels))
}
