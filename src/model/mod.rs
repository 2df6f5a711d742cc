//! Data model.
//!
//! - [`ProjectItem`]: one tracked work item after normalization
//! - [`RawItem`]: the record as exported by the tracker
//! - [`WorkflowState`], [`ContentType`], [`CloseReason`]: closed vocabularies

mod item;
mod raw;
mod types;

pub use item::{Iteration, Milestone, ProjectItem};
pub use raw::{
    Conversion, FieldIssue, FieldIssueKind, RawFieldValue, RawItem, RawNumber, convert_all,
    parse_date, parse_datetime,
};
pub use types::{CloseReason, ContentType, WorkflowState};
