//! Cumulative burn-up series.
//!
//! Three running totals are kept per day of the window: scope opened,
//! scope completed and scope removed as duplicate. Each is a fold over a
//! day-sorted event list. After the walk, the last point of every series is
//! overwritten with totals recomputed from the item set, so the chart ends
//! on exactly the numbers the snapshot tables report. Items whose status
//! changed after the window end make that last step jump; this is accepted.

use super::window::Window;
use crate::classify::{is_completed, is_duplicate};
use crate::model::{ProjectItem, WorkflowState};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Scope,
    Done,
    Duplicate,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    day: NaiveDate,
    kind: EventKind,
    weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnupSeries {
    pub dates: Vec<NaiveDate>,
    pub scope: Vec<f64>,
    pub done: Vec<f64>,
    pub duplicate: Vec<f64>,
    pub total_scope: f64,
    pub total_done: f64,
    pub total_duplicate: f64,
    /// `total_scope - total_done - total_duplicate`. Done or duplicate items
    /// created after the window end count in their totals but not in scope,
    /// so this can go negative.
    pub open_scope_final: f64,
}

impl BurnupSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Cancelled work never enters the burn-up.
fn counts_toward_burnup(item: &ProjectItem) -> bool {
    item.workflow_state != WorkflowState::Cancelled
}

fn collect_events(items: &[&ProjectItem], end: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();
    for item in items.iter().filter(|i| counts_toward_burnup(i)) {
        let weight = item.weight();
        let created = item.created_day();
        if created <= end {
            events.push(Event {
                day: created,
                kind: EventKind::Scope,
                weight,
            });
        }

        let status_day = item.status_day();
        if status_day > end {
            continue;
        }
        if is_duplicate(item) {
            events.push(Event {
                day: status_day,
                kind: EventKind::Duplicate,
                weight,
            });
        } else if is_completed(item) {
            events.push(Event {
                day: status_day,
                kind: EventKind::Done,
                weight,
            });
        }
    }
    events.sort_by_key(|event| event.day);
    events
}

/// Build the day-indexed cumulative series over `window.start..=window.end`.
pub fn build_burnup(items: &[&ProjectItem], window: &Window) -> BurnupSeries {
    let events = collect_events(items, window.end);
    let dates = window.dates();

    let mut scope = Vec::with_capacity(dates.len());
    let mut done = Vec::with_capacity(dates.len());
    let mut duplicate = Vec::with_capacity(dates.len());
    let (mut scope_acc, mut done_acc, mut dup_acc) = (0.0_f64, 0.0_f64, 0.0_f64);

    let mut pending = events.iter().peekable();
    for day in &dates {
        while let Some(event) = pending.next_if(|event| event.day <= *day) {
            match event.kind {
                EventKind::Scope => scope_acc += event.weight,
                EventKind::Done => done_acc += event.weight,
                EventKind::Duplicate => dup_acc += event.weight,
            }
        }
        scope.push(scope_acc);
        done.push(done_acc);
        duplicate.push(dup_acc);
    }

    let counted: Vec<&ProjectItem> = items
        .iter()
        .copied()
        .filter(|i| counts_toward_burnup(i))
        .collect();
    let total_scope: f64 = counted
        .iter()
        .filter(|i| i.created_day() <= window.end)
        .map(|i| i.weight())
        .sum();
    let total_duplicate: f64 = counted
        .iter()
        .filter(|i| is_duplicate(i))
        .map(|i| i.weight())
        .sum();
    let total_done: f64 = counted
        .iter()
        .filter(|i| is_completed(i))
        .map(|i| i.weight())
        .sum();

    if let (Some(s), Some(d), Some(x)) = (scope.last_mut(), done.last_mut(), duplicate.last_mut()) {
        *s = total_scope;
        *d = total_done;
        *x = total_duplicate;
    }

    tracing::debug!(
        days = dates.len(),
        events = events.len(),
        total_scope,
        total_done,
        total_duplicate,
        "Built burn-up series"
    );

    BurnupSeries {
        dates,
        scope,
        done,
        duplicate,
        total_scope,
        total_done,
        total_duplicate,
        open_scope_final: total_scope - total_done - total_duplicate,
    }
}
