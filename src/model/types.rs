use crate::error::{BurnupError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Canonical lifecycle bucket, ordered by pipeline stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Backlog,
    Blocked,
    Progress,
    Review,
    Done,
    Duplicate,
    Cancelled,
    NoStatus,
}

impl WorkflowState {
    /// Columns reported by the status tables, in pipeline order.
    pub const TABLE_COLUMNS: [WorkflowState; 6] = [
        WorkflowState::Backlog,
        WorkflowState::Blocked,
        WorkflowState::Progress,
        WorkflowState::Review,
        WorkflowState::Done,
        WorkflowState::Duplicate,
    ];

    /// Columns of the open-work breakdowns (milestones, labels, weekly).
    pub const WORK_COLUMNS: [WorkflowState; 5] = [
        WorkflowState::Backlog,
        WorkflowState::Blocked,
        WorkflowState::Progress,
        WorkflowState::Review,
        WorkflowState::Done,
    ];

    /// Fold `no_status` into `backlog` for tables without a no-status column.
    pub fn table_bucket(self) -> WorkflowState {
        match self {
            WorkflowState::NoStatus => WorkflowState::Backlog,
            other => other,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::Backlog => write!(f, "backlog"),
            WorkflowState::Blocked => write!(f, "blocked"),
            WorkflowState::Progress => write!(f, "progress"),
            WorkflowState::Review => write!(f, "review"),
            WorkflowState::Done => write!(f, "done"),
            WorkflowState::Duplicate => write!(f, "duplicate"),
            WorkflowState::Cancelled => write!(f, "cancelled"),
            WorkflowState::NoStatus => write!(f, "no_status"),
        }
    }
}

impl FromStr for WorkflowState {
    type Err = BurnupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "backlog" => Ok(WorkflowState::Backlog),
            "blocked" => Ok(WorkflowState::Blocked),
            "progress" | "in-progress" | "in_progress" => Ok(WorkflowState::Progress),
            "review" | "in-review" | "in_review" => Ok(WorkflowState::Review),
            "done" => Ok(WorkflowState::Done),
            "duplicate" => Ok(WorkflowState::Duplicate),
            "cancelled" | "canceled" => Ok(WorkflowState::Cancelled),
            "no_status" | "no-status" => Ok(WorkflowState::NoStatus),
            _ => Err(BurnupError::Parse(format!("Invalid workflow state: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContentType {
    #[default]
    Issue,
    PullRequest,
    DraftIssue,
}

impl ContentType {
    /// Pull requests and drafts never count as tracked work.
    pub fn is_tracked(self) -> bool {
        self == ContentType::Issue
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Issue => write!(f, "Issue"),
            ContentType::PullRequest => write!(f, "PullRequest"),
            ContentType::DraftIssue => write!(f, "DraftIssue"),
        }
    }
}

impl FromStr for ContentType {
    type Err = BurnupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "issue" => Ok(ContentType::Issue),
            "pullrequest" | "pr" => Ok(ContentType::PullRequest),
            "draftissue" | "draft" => Ok(ContentType::DraftIssue),
            _ => Err(BurnupError::Parse(format!("Invalid content type: {}", s))),
        }
    }
}

/// Why a tracker closed an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Completed,
    NotPlanned,
    Duplicate,
    Other(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::Completed => write!(f, "completed"),
            CloseReason::NotPlanned => write!(f, "not_planned"),
            CloseReason::Duplicate => write!(f, "duplicate"),
            CloseReason::Other(reason) => write!(f, "{}", reason),
        }
    }
}

impl FromStr for CloseReason {
    type Err = BurnupError;

    /// Total: anything unrecognised is kept as `Other`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "completed" => CloseReason::Completed,
            "not_planned" => CloseReason::NotPlanned,
            "duplicate" => CloseReason::Duplicate,
            _ => CloseReason::Other(s.trim().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_bucket_folds_no_status() {
        assert_eq!(WorkflowState::NoStatus.table_bucket(), WorkflowState::Backlog);
        assert_eq!(WorkflowState::Review.table_bucket(), WorkflowState::Review);
    }

    #[test]
    fn test_workflow_state_roundtrips_through_display() {
        for state in WorkflowState::TABLE_COLUMNS {
            assert_eq!(state.to_string().parse::<WorkflowState>().unwrap(), state);
        }
    }

    #[test]
    fn test_content_type_parsing() {
        assert_eq!("PullRequest".parse::<ContentType>().unwrap(), ContentType::PullRequest);
        assert_eq!("draft_issue".parse::<ContentType>().unwrap(), ContentType::DraftIssue);
        assert!("Epic".parse::<ContentType>().is_err());
        assert!(!ContentType::DraftIssue.is_tracked());
    }

    #[test]
    fn test_close_reason_is_total() {
        assert_eq!("NOT_PLANNED".parse::<CloseReason>().unwrap(), CloseReason::NotPlanned);
        assert_eq!("not planned".parse::<CloseReason>().unwrap(), CloseReason::NotPlanned);
        assert_eq!(
            "reopened".parse::<CloseReason>().unwrap(),
            CloseReason::Other("reopened".to_string())
        );
    }
}
