//! Item-level classification: duplicates, eligibility and the
//! milestone/iteration lookups that pick what a report covers.

use crate::model::{CloseReason, ProjectItem, WorkflowState};
use crate::normalize::text_contains;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Label spellings that flag an item as a duplicate.
pub const DUPLICATE_LABELS: &[&str] = &["duplicate", "duplicado"];

/// Duplicate by status, by label or by the tracker's close reason.
pub fn is_duplicate(item: &ProjectItem) -> bool {
    item.workflow_state == WorkflowState::Duplicate
        || item.labels.iter().any(|label| {
            let label = label.trim().to_lowercase();
            DUPLICATE_LABELS.contains(&label.as_str())
        })
        || item.close_reason == Some(CloseReason::Duplicate)
}

/// Done and not a duplicate: the only items credited as completed work in
/// the burn-up and cross-tabs.
pub fn is_completed(item: &ProjectItem) -> bool {
    item.workflow_state == WorkflowState::Done && !is_duplicate(item)
}

/// Which items a report looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Keep only items whose milestone title contains this name.
    pub milestone: Option<String>,
}

impl ItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_milestone(mut self, milestone: Option<String>) -> Self {
        self.milestone = milestone.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn is_eligible(&self, item: &ProjectItem) -> bool {
        if !is_tracked(item) {
            return false;
        }
        match &self.milestone {
            Some(target) => item
                .milestone_title()
                .is_some_and(|title| text_contains(title, target)),
            None => true,
        }
    }

    pub fn apply<'a>(&self, items: &'a [ProjectItem]) -> Vec<&'a ProjectItem> {
        items.iter().filter(|item| self.is_eligible(item)).collect()
    }
}

/// Eligibility without any milestone restriction: issues only, not
/// archived, not closed as "not planned".
pub fn is_tracked(item: &ProjectItem) -> bool {
    item.content_type.is_tracked()
        && !item.is_archived
        && item.close_reason != Some(CloseReason::NotPlanned)
}

pub fn is_eligible(item: &ProjectItem, filter: &ItemFilter) -> bool {
    filter.is_eligible(item)
}

/// The milestone whose items reach furthest into the future, judged by
/// iteration end (or creation day when the item has no iteration).
pub fn latest_milestone(items: &[ProjectItem]) -> Option<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: HashMap<&str, NaiveDate> = HashMap::new();

    for item in items.iter().filter(|item| is_tracked(item)) {
        let Some(title) = item.milestone_title() else {
            continue;
        };
        let day = item
            .iteration
            .as_ref()
            .map(|it| it.end_date)
            .unwrap_or_else(|| item.created_day());
        match latest.get_mut(title) {
            Some(current) if day > *current => *current = day,
            Some(_) => {}
            None => {
                order.push(title);
                latest.insert(title, day);
            }
        }
    }

    let mut best: Option<(&str, NaiveDate)> = None;
    for title in order {
        let day = latest[title];
        if best.is_none_or(|(_, best_day)| day > best_day) {
            best = Some((title, day));
        }
    }
    best.map(|(title, _)| title.to_string())
}

/// Title of the iteration running on `today`: the soonest one ending on or
/// after it, else the one that started last.
pub fn current_iteration(items: &[ProjectItem], today: NaiveDate) -> Option<String> {
    let iterations: Vec<_> = items.iter().filter_map(|i| i.iteration.as_ref()).collect();

    let upcoming = iterations
        .iter()
        .filter(|it| it.end_date >= today)
        .min_by_key(|it| it.end_date);

    upcoming
        .or_else(|| iterations.iter().max_by_key(|it| it.start_date))
        .map(|it| it.title.clone())
        .filter(|title| !title.is_empty())
}
