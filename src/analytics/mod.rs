//! The aggregation engine.
//!
//! [`analyze`] is pure over its inputs: the same items and parameters always
//! give the same [`Report`]. Each table is also available on its own.

pub mod burnup;
pub mod crosstab;
pub mod snapshot;
pub mod weekly;
pub mod window;

pub use burnup::{BurnupSeries, build_burnup};
pub use crosstab::{LabelRow, MilestoneRow, NO_MILESTONE, build_label_table, build_milestone_table};
pub use snapshot::{StatusCell, StatusTable, build_status_table, classify_as_of, percent};
pub use weekly::{WeekRange, WeeklyProgress, parse_week_id, weekly_progress};
pub use window::{Window, resolve_window};

use crate::classify::{ItemFilter, current_iteration};
use crate::config::AnalyticsSettings;
use crate::model::ProjectItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AnalysisParams {
    pub reference_date: NaiveDate,
    pub filter: ItemFilter,
    pub week: Option<WeekRange>,
    pub settings: AnalyticsSettings,
}

impl AnalysisParams {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            filter: ItemFilter::default(),
            week: None,
            settings: AnalyticsSettings::default(),
        }
    }

    pub fn with_milestone(mut self, milestone: Option<String>) -> Self {
        self.filter = self.filter.with_milestone(milestone);
        self
    }

    /// Report on a given week; the snapshot is taken on its Sunday.
    pub fn with_week(mut self, week: Option<WeekRange>) -> Self {
        if let Some(week) = week {
            self.reference_date = week.end;
        }
        self.week = week;
        self
    }

    pub fn with_settings(mut self, settings: AnalyticsSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub milestone: Option<String>,
    pub window: Window,
    pub burnup: BurnupSeries,
    pub status: StatusTable,
    pub milestones: Vec<MilestoneRow>,
    pub labels: Vec<LabelRow>,
    pub current_iteration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<WeeklyProgress>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Ready(Box<Report>),
    /// Nothing passed the filters. Callers report "no data", not a failure.
    NoEligibleItems,
}

impl AnalysisOutcome {
    pub fn into_report(self) -> Option<Report> {
        match self {
            AnalysisOutcome::Ready(report) => Some(*report),
            AnalysisOutcome::NoEligibleItems => None,
        }
    }
}

/// Run every aggregation over `items` under `params`.
pub fn analyze(items: &[ProjectItem], params: &AnalysisParams) -> AnalysisOutcome {
    let eligible = params.filter.apply(items);
    tracing::info!(
        total = items.len(),
        eligible = eligible.len(),
        milestone = params.filter.milestone.as_deref().unwrap_or("-"),
        reference = %params.reference_date,
        "Analyzing items"
    );

    let Some(window) = resolve_window(
        &eligible,
        params.reference_date,
        params.settings.window_fallback_days,
    ) else {
        tracing::info!("No eligible items");
        return AnalysisOutcome::NoEligibleItems;
    };

    let report = Report {
        milestone: params.filter.milestone.clone(),
        burnup: build_burnup(&eligible, &window),
        status: build_status_table(&eligible, window.cutoff),
        milestones: build_milestone_table(items),
        labels: build_label_table(&eligible, &params.settings),
        current_iteration: current_iteration(items, params.reference_date),
        weekly: params.week.map(|week| weekly_progress(&eligible, week)),
        window,
    };
    AnalysisOutcome::Ready(Box::new(report))
}
