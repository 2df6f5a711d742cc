//! Milestone and label breakdowns of current workflow state.

use crate::classify::{is_duplicate, is_tracked};
use crate::config::AnalyticsSettings;
use crate::model::{ProjectItem, WorkflowState};
use crate::normalize::normalize_text;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Bucket for items without a milestone.
pub const NO_MILESTONE: &str = "No Milestone";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRow {
    pub name: String,
    pub hours: BTreeMap<WorkflowState, f64>,
    pub difficulty: BTreeMap<WorkflowState, f64>,
    pub count: BTreeMap<WorkflowState, usize>,
}

impl MilestoneRow {
    fn new(name: String) -> Self {
        Self {
            name,
            hours: zeroed(),
            difficulty: zeroed(),
            count: zeroed(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.count.values().sum()
    }

    pub fn total_difficulty(&self) -> f64 {
        self.difficulty.values().sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.hours.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRow {
    pub label: String,
    pub counts: BTreeMap<WorkflowState, usize>,
    pub total: usize,
}

fn zeroed<T: Default>() -> BTreeMap<WorkflowState, T> {
    WorkflowState::WORK_COLUMNS
        .iter()
        .map(|state| (*state, T::default()))
        .collect()
}

/// Cancelled and duplicate items are grouped but never summed.
fn contributes(item: &ProjectItem) -> bool {
    item.workflow_state != WorkflowState::Cancelled && !is_duplicate(item)
}

fn display_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Per-milestone sums over every tracked item, ignoring any milestone filter.
///
/// Titles that differ only in case, accents or surrounding whitespace share
/// a row, shown under the first spelling seen. Rows come out in discovery
/// order.
pub fn build_milestone_table(items: &[ProjectItem]) -> Vec<MilestoneRow> {
    let mut rows: Vec<MilestoneRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items.iter().filter(|item| is_tracked(item)) {
        let title = item
            .milestone_title()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(NO_MILESTONE);
        let display = display_title(title);
        let key = normalize_text(&display);
        let slot = *index.entry(key).or_insert_with(|| {
            rows.push(MilestoneRow::new(display));
            rows.len() - 1
        });

        if !contributes(item) {
            continue;
        }
        let state = item.workflow_state.table_bucket();
        let row = &mut rows[slot];
        *row.count.entry(state).or_default() += 1;
        *row.difficulty.entry(state).or_default() += item.weight();
        *row.hours.entry(state).or_default() += item.estimate_hours.max(0.0);
    }

    tracing::debug!(rows = rows.len(), "Built milestone table");
    rows
}

/// Per-label state counts over eligible items, largest first.
///
/// Labels match case-insensitively and show their first-seen spelling. Ties
/// keep discovery order. The excluded label never appears.
pub fn build_label_table(items: &[&ProjectItem], settings: &AnalyticsSettings) -> Vec<LabelRow> {
    let excluded = settings.excluded_label.trim().to_lowercase();
    let mut rows: Vec<LabelRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items.iter().filter(|item| contributes(item)) {
        let state = item.workflow_state.table_bucket();
        let mut seen: Vec<String> = Vec::new();

        for label in &item.labels {
            let display = label.trim();
            if display.is_empty() {
                continue;
            }
            let key = display.to_lowercase();
            if key == excluded || seen.contains(&key) {
                continue;
            }
            seen.push(key.clone());

            let slot = *index.entry(key).or_insert_with(|| {
                rows.push(LabelRow {
                    label: display.to_string(),
                    counts: zeroed(),
                    total: 0,
                });
                rows.len() - 1
            });
            let row = &mut rows[slot];
            *row.counts.entry(state).or_default() += 1;
            row.total += 1;
        }
    }

    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows.truncate(settings.top_labels);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, Milestone};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn item(id: &str, status: &str) -> ProjectItem {
        ProjectItem::new(id, Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap())
            .with_status(status)
            .with_difficulty(2.0)
            .with_estimate_hours(4.0)
    }

    fn in_milestone(item: ProjectItem, title: &str) -> ProjectItem {
        item.with_milestone(Some(Milestone::new(title)))
    }

    fn labelled(item: ProjectItem, labels: &[&str]) -> ProjectItem {
        item.with_labels(labels.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_milestones_group_by_normalized_title() {
        let items = vec![
            in_milestone(item("a", "Done"), "Entrega  Março"),
            in_milestone(item("b", "In Progress"), "entrega março"),
            item("c", "Todo"),
        ];
        let rows = build_milestone_table(&items);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Entrega Março");
        assert_eq!(rows[0].count[&WorkflowState::Done], 1);
        assert_eq!(rows[0].count[&WorkflowState::Progress], 1);
        assert_eq!(rows[0].total_difficulty(), 4.0);
        assert_eq!(rows[0].total_hours(), 8.0);
        assert_eq!(rows[1].name, NO_MILESTONE);
        assert_eq!(rows[1].count[&WorkflowState::Backlog], 1);
    }

    #[test]
    fn test_milestone_row_exists_for_dropped_items() {
        let items = vec![
            in_milestone(item("a", "Cancelled"), "Q3"),
            in_milestone(item("b", "Duplicate"), "Q3"),
            in_milestone(item("c", "Done").with_labels(vec!["duplicado".into()]), "Q3"),
        ];
        let rows = build_milestone_table(&items);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_count(), 0);
        assert_eq!(rows[0].total_difficulty(), 0.0);
    }

    #[test]
    fn test_milestone_table_skips_untracked() {
        let items = vec![in_milestone(
            item("a", "Done").with_content_type(ContentType::PullRequest),
            "Q3",
        )];
        assert!(build_milestone_table(&items).is_empty());
    }

    #[test]
    fn test_labels_sorted_with_stable_ties() {
        let items = [
            labelled(item("a", "Todo"), &["ui", "backend"]),
            labelled(item("b", "Done"), &["Backend", "docs"]),
            labelled(item("c", "Done"), &["ui"]),
            labelled(item("d", "Review"), &["docs", "report-ignore"]),
        ];
        let refs: Vec<&ProjectItem> = items.iter().collect();
        let rows = build_label_table(&refs, &AnalyticsSettings::default());

        let names: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(names, vec!["ui", "backend", "docs"]);
        assert_eq!(rows[1].total, 2);
        assert_eq!(rows[1].counts[&WorkflowState::Backlog], 1);
        assert_eq!(rows[1].counts[&WorkflowState::Done], 1);
        assert_eq!(rows[2].counts[&WorkflowState::Review], 1);
    }

    #[test]
    fn test_label_counted_once_per_item() {
        let items = [labelled(item("a", "Todo"), &["Bug", "bug", "BUG"])];
        let refs: Vec<&ProjectItem> = items.iter().collect();
        let rows = build_label_table(&refs, &AnalyticsSettings::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Bug");
        assert_eq!(rows[0].total, 1);
    }

    #[test]
    fn test_label_table_cap_and_exclusions() {
        let items: Vec<ProjectItem> = (0..20)
            .map(|n| labelled(item(&format!("i{n}"), "Todo"), &[&format!("l{n}")]))
            .chain([
                labelled(item("x", "Cancelled"), &["gone"]),
                labelled(item("y", "Duplicate"), &["gone"]),
            ])
            .collect();
        let refs: Vec<&ProjectItem> = items.iter().collect();
        let settings = AnalyticsSettings::default();
        let rows = build_label_table(&refs, &settings);

        assert_eq!(rows.len(), 15);
        assert!(rows.iter().all(|r| r.label != "gone"));
        assert_eq!(rows[0].label, "l0");
        assert_eq!(rows[14].label, "l14");
    }
}
