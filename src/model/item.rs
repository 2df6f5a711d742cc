use super::types::{CloseReason, ContentType, WorkflowState};
use crate::normalize::classify_status;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Iteration {
    /// `None` when the end date falls outside the representable calendar.
    pub fn new(title: String, start_date: NaiveDate, duration_days: i64) -> Option<Self> {
        let end_date = Duration::try_days(duration_days.max(0))
            .and_then(|span| start_date.checked_add_signed(span))?;
        Some(Self {
            title,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Milestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// One tracked work item, as seen by the analytics engine.
///
/// Built once per aggregation call and never mutated afterwards; the
/// `with_*` builders exist for construction only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub id: String,
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,

    pub workflow_state: WorkflowState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<Iteration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,

    #[serde(default)]
    pub difficulty: f64,

    #[serde(default)]
    pub estimate_hours: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    #[serde(default)]
    pub content_type: ContentType,

    #[serde(default)]
    pub is_archived: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<CloseReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

impl ProjectItem {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            status: String::new(),
            status_updated_at: None,
            workflow_state: WorkflowState::NoStatus,
            iteration: None,
            milestone: None,
            difficulty: 0.0,
            estimate_hours: 0.0,
            labels: Vec::new(),
            content_type: ContentType::default(),
            is_archived: false,
            close_reason: None,
            repository: None,
        }
    }

    /// Set the raw status; the workflow state is derived from it.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self.workflow_state = classify_status(&self.status);
        self
    }

    pub fn with_status_updated_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.status_updated_at = at;
        self
    }

    pub fn with_iteration(mut self, iteration: Option<Iteration>) -> Self {
        self.iteration = iteration;
        self
    }

    pub fn with_milestone(mut self, milestone: Option<Milestone>) -> Self {
        self.milestone = milestone;
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_estimate_hours(mut self, hours: f64) -> Self {
        self.estimate_hours = hours;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_archived(mut self, archived: bool) -> Self {
        self.is_archived = archived;
        self
    }

    pub fn with_close_reason(mut self, reason: Option<CloseReason>) -> Self {
        self.close_reason = reason;
        self
    }

    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    pub fn created_day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Day the item reached its current status, falling back to creation.
    pub fn status_day(&self) -> NaiveDate {
        self.status_updated_at
            .unwrap_or(self.created_at)
            .date_naive()
    }

    pub fn milestone_title(&self) -> Option<&str> {
        self.milestone.as_ref().map(|m| m.title.as_str())
    }

    pub fn milestone_due(&self) -> Option<NaiveDate> {
        self.milestone.as_ref().and_then(|m| m.due_date)
    }

    /// Effort weight, clamped so a negative field cannot shrink totals.
    pub fn weight(&self) -> f64 {
        if self.difficulty.is_finite() {
            self.difficulty.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_with_status_derives_workflow_state() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let item = ProjectItem::new("item-1", created).with_status("In Progress");
        assert_eq!(item.workflow_state, WorkflowState::Progress);

        let item = ProjectItem::new("item-2", created);
        assert_eq!(item.workflow_state, WorkflowState::NoStatus);
    }

    #[test]
    fn test_status_day_falls_back_to_creation() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        let item = ProjectItem::new("item-1", created);
        assert_eq!(item.status_day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let updated = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        let item = item.with_status_updated_at(Some(updated));
        assert_eq!(item.status_day(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_iteration_end_date() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 29).unwrap();
        let iteration = Iteration::new("Sprint 5".to_string(), start, 14).unwrap();
        assert_eq!(iteration.end_date, NaiveDate::from_ymd_opt(2024, 2, 12).unwrap());
    }

    #[test]
    fn test_iteration_end_date_out_of_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 29).unwrap();
        assert!(Iteration::new("Forever".to_string(), start, 1_000_000_000).is_none());
        assert!(Iteration::new("Forever".to_string(), start, i64::MAX).is_none());
        assert!(Iteration::new("Edge".to_string(), NaiveDate::MAX, 0).is_some());
    }

    #[test]
    fn test_weight_is_never_negative() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(ProjectItem::new("a", created).with_difficulty(-2.0).weight(), 0.0);
        assert_eq!(ProjectItem::new("b", created).with_difficulty(2.5).weight(), 2.5);
    }
}
