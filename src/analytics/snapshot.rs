//! Status table "as of" a cutoff date.

use crate::classify::is_duplicate;
use crate::model::{ProjectItem, WorkflowState};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count and difficulty sum of one table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCell {
    pub count: usize,
    pub difficulty: f64,
}

impl StatusCell {
    pub fn add(&mut self, weight: f64) {
        self.count += 1;
        self.difficulty += weight;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTable {
    pub cutoff: NaiveDate,
    /// One cell per table column, present even when empty.
    pub by_status: BTreeMap<WorkflowState, StatusCell>,
    pub total: StatusCell,
    pub done_pct_count: u32,
    pub done_pct_difficulty: u32,
    pub done_review_pct_count: u32,
    pub done_review_pct_difficulty: u32,
}

impl StatusTable {
    pub fn cell(&self, state: WorkflowState) -> StatusCell {
        self.by_status.get(&state).copied().unwrap_or_default()
    }
}

/// Whole-percent share of `part` in `total`, 0 when `total` is not positive.
pub fn percent(part: f64, total: f64) -> u32 {
    if total <= 0.0 || !part.is_finite() {
        return 0;
    }
    let pct = (part / total * 100.0).round();
    if pct <= 0.0 { 0 } else { pct as u32 }
}

/// Where an item sits in the snapshot taken at `cutoff`, or `None` when it
/// does not appear at all.
///
/// Status changes dated after the cutoff have not happened yet, so those
/// items read as backlog. A duplicate that is also nominally done keeps its
/// completion credit here; everywhere else duplicate wins.
pub fn classify_as_of(item: &ProjectItem, cutoff: NaiveDate) -> Option<WorkflowState> {
    if item.created_day() > cutoff {
        return None;
    }

    let changed_by_cutoff = item.status_day() <= cutoff;

    if is_duplicate(item) {
        let state = if item.workflow_state == WorkflowState::Done {
            WorkflowState::Done
        } else {
            WorkflowState::Duplicate
        };
        return Some(if changed_by_cutoff {
            state
        } else {
            WorkflowState::Backlog
        });
    }

    if !changed_by_cutoff {
        return Some(WorkflowState::Backlog);
    }
    match item.workflow_state {
        WorkflowState::Cancelled => None,
        state => Some(state.table_bucket()),
    }
}

pub fn build_status_table(items: &[&ProjectItem], cutoff: NaiveDate) -> StatusTable {
    let mut by_status: BTreeMap<WorkflowState, StatusCell> = WorkflowState::TABLE_COLUMNS
        .iter()
        .map(|state| (*state, StatusCell::default()))
        .collect();
    let mut total = StatusCell::default();

    for item in items {
        let Some(state) = classify_as_of(item, cutoff) else {
            continue;
        };
        let weight = item.weight();
        by_status.entry(state).or_default().add(weight);
        total.add(weight);
    }

    let cell = |state: WorkflowState| by_status.get(&state).copied().unwrap_or_default();
    let done = cell(WorkflowState::Done);
    let review = cell(WorkflowState::Review);

    StatusTable {
        cutoff,
        done_pct_count: percent(done.count as f64, total.count as f64),
        done_pct_difficulty: percent(done.difficulty, total.difficulty),
        done_review_pct_count: percent((done.count + review.count) as f64, total.count as f64),
        done_review_pct_difficulty: percent(done.difficulty + review.difficulty, total.difficulty),
        by_status,
        total,
    }
}
