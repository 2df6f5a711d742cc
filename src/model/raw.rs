//! Raw item records as delivered by the tracker export, and their
//! conversion into [`ProjectItem`]s.
//!
//! Conversion never fails. A field that cannot be read is replaced by its
//! documented default and reported as a [`FieldIssue`] so one bad record
//! cannot abort a whole report.

use super::item::{Iteration, Milestone, ProjectItem};
use super::types::{CloseReason, ContentType};
use crate::config::FieldNames;
use crate::normalize::{map_difficulty, parse_numeric, text_eq};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: String,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub is_archived: bool,

    #[serde(default)]
    pub close_reason: Option<String>,

    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub field_values: Vec<RawFieldValue>,
}

/// A number that may arrive as JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

/// A custom-field value, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RawFieldValue {
    SingleSelect {
        field: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        updated_at: Option<String>,
    },
    Number {
        field: String,
        #[serde(default)]
        number: Option<RawNumber>,
    },
    Text {
        field: String,
        #[serde(default)]
        text: Option<String>,
    },
    Date {
        field: String,
        #[serde(default)]
        date: Option<String>,
    },
    Milestone {
        field: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        due_on: Option<String>,
    },
    Iteration {
        field: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        start_date: Option<String>,
        #[serde(default)]
        duration: Option<i64>,
    },
}

impl RawFieldValue {
    pub fn field(&self) -> &str {
        match self {
            RawFieldValue::SingleSelect { field, .. }
            | RawFieldValue::Number { field, .. }
            | RawFieldValue::Text { field, .. }
            | RawFieldValue::Date { field, .. }
            | RawFieldValue::Milestone { field, .. }
            | RawFieldValue::Iteration { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldIssueKind {
    /// A difficulty/estimate/content value that could not be read; 0 or the
    /// default was used.
    UnparseableField,
    /// A timestamp or date that could not be read; the documented fallback
    /// was used.
    InvalidDateField,
}

impl fmt::Display for FieldIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssueKind::UnparseableField => write!(f, "unparseable field"),
            FieldIssueKind::InvalidDateField => write!(f, "invalid date field"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub item_id: String,
    pub field: String,
    pub value: Option<String>,
    pub kind: FieldIssueKind,
}

/// Items converted from one source snapshot, with everything that had to be
/// defaulted along the way.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub items: Vec<ProjectItem>,
    pub issues: Vec<FieldIssue>,
}

/// Convert a whole snapshot. `now` stands in for missing creation times.
pub fn convert_all(raw: Vec<RawItem>, fields: &FieldNames, now: DateTime<Utc>) -> Conversion {
    let mut conversion = Conversion::default();
    for record in raw {
        let item = ProjectItem::from_raw(record, fields, now, &mut conversion.issues);
        conversion.items.push(item);
    }
    for issue in &conversion.issues {
        tracing::warn!(
            item = %issue.item_id,
            field = %issue.field,
            value = issue.value.as_deref().unwrap_or(""),
            "Recovered {}",
            issue.kind
        );
    }
    tracing::debug!(
        items = conversion.items.len(),
        issues = conversion.issues.len(),
        "Converted raw items"
    );
    conversion
}

/// Accumulates the routed field values of one record.
#[derive(Default)]
struct Extracted {
    status: String,
    status_updated_at: Option<DateTime<Utc>>,
    iteration: Option<Iteration>,
    milestone: Option<Milestone>,
    difficulty: f64,
    estimate_hours: f64,
}

struct Recorder<'a> {
    item_id: &'a str,
    issues: &'a mut Vec<FieldIssue>,
}

impl Recorder<'_> {
    fn push(&mut self, field: &str, value: Option<&str>, kind: FieldIssueKind) {
        self.issues.push(FieldIssue {
            item_id: self.item_id.to_string(),
            field: field.to_string(),
            value: value.map(str::to_string),
            kind,
        });
    }

    fn datetime(&mut self, field: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        let parsed = parse_datetime(value);
        if parsed.is_none() {
            self.push(field, Some(value), FieldIssueKind::InvalidDateField);
        }
        parsed
    }

    fn date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        let parsed = parse_date(value);
        if parsed.is_none() {
            self.push(field, Some(value), FieldIssueKind::InvalidDateField);
        }
        parsed
    }

    fn difficulty(&mut self, field: &str, label: Option<&str>) -> f64 {
        let weight = map_difficulty(label);
        if let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) {
            if weight == 0.0 && !label.chars().any(|c| c.is_ascii_digit()) {
                self.push(field, Some(label), FieldIssueKind::UnparseableField);
            }
        }
        weight
    }

    fn number(&mut self, field: &str, value: Option<&RawNumber>, label_mapping: bool) -> f64 {
        match value {
            None => 0.0,
            Some(RawNumber::Number(n)) if n.is_finite() => *n,
            Some(RawNumber::Number(_)) => {
                self.push(field, None, FieldIssueKind::UnparseableField);
                0.0
            }
            Some(RawNumber::Text(text)) if label_mapping => self.difficulty(field, Some(text)),
            Some(RawNumber::Text(text)) => self.estimate(field, Some(text)),
        }
    }

    fn estimate(&mut self, field: &str, text: Option<&str>) -> f64 {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return 0.0;
        };
        if !text.chars().any(|c| c.is_ascii_digit()) {
            self.push(field, Some(text), FieldIssueKind::UnparseableField);
        }
        parse_numeric(text)
    }
}

impl ProjectItem {
    /// Build the canonical item from a raw record, routing custom fields by
    /// the configured field names.
    pub fn from_raw(
        raw: RawItem,
        fields: &FieldNames,
        now: DateTime<Utc>,
        issues: &mut Vec<FieldIssue>,
    ) -> Self {
        let mut rec = Recorder {
            item_id: &raw.id,
            issues,
        };

        let created_at = match raw.created_at.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => parse_datetime(value).unwrap_or_else(|| {
                rec.push("createdAt", Some(value), FieldIssueKind::InvalidDateField);
                now
            }),
            _ => {
                rec.push("createdAt", None, FieldIssueKind::InvalidDateField);
                now
            }
        };

        let content_type = match raw.content_type.as_deref() {
            None => ContentType::Issue,
            Some(value) => value.parse::<ContentType>().unwrap_or_else(|_| {
                rec.push("contentType", Some(value), FieldIssueKind::UnparseableField);
                ContentType::Issue
            }),
        };

        let mut extracted = Extracted::default();
        for value in &raw.field_values {
            route_field(value, fields, &mut extracted, &mut rec);
        }

        let close_reason = raw
            .close_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .and_then(|r| r.parse::<CloseReason>().ok());

        let labels = raw
            .labels
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        ProjectItem::new(raw.id.clone(), created_at)
            .with_status(extracted.status)
            .with_status_updated_at(extracted.status_updated_at)
            .with_iteration(extracted.iteration)
            .with_milestone(extracted.milestone)
            .with_difficulty(extracted.difficulty)
            .with_estimate_hours(extracted.estimate_hours)
            .with_labels(labels)
            .with_content_type(content_type)
            .with_archived(raw.is_archived)
            .with_close_reason(close_reason)
            .with_repository(raw.repository.filter(|r| !r.trim().is_empty()))
    }
}

fn route_field(
    value: &RawFieldValue,
    fields: &FieldNames,
    out: &mut Extracted,
    rec: &mut Recorder<'_>,
) {
    let name = value.field();

    if text_eq(name, &fields.status) {
        match value {
            RawFieldValue::SingleSelect {
                name: Some(status),
                updated_at,
                ..
            } if !status.trim().is_empty() => {
                out.status = status.clone();
                out.status_updated_at = rec.datetime(name, updated_at.as_deref());
            }
            RawFieldValue::Text {
                text: Some(status), ..
            } if !status.trim().is_empty() => {
                out.status = status.clone();
            }
            _ => {}
        }
    }

    if text_eq(name, &fields.iteration) {
        if let RawFieldValue::Iteration {
            title,
            start_date,
            duration,
            ..
        } = value
        {
            if let Some(start) = rec.date(name, start_date.as_deref()) {
                let title = title.clone().unwrap_or_default();
                let duration = duration.unwrap_or(0);
                out.iteration = Iteration::new(title, start, duration);
                if out.iteration.is_none() {
                    let value = format!("{} +{}d", start, duration);
                    rec.push(name, Some(&value), FieldIssueKind::InvalidDateField);
                }
            }
        }
    }

    if text_eq(name, &fields.milestone) {
        let milestone = match value {
            RawFieldValue::SingleSelect { name: title, .. }
            | RawFieldValue::Text { text: title, .. } => title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(Milestone::new),
            RawFieldValue::Milestone { title, due_on, .. } => title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| {
                    let milestone = Milestone::new(t);
                    match rec.date(name, due_on.as_deref()) {
                        Some(due) => milestone.with_due_date(due),
                        None => milestone,
                    }
                }),
            _ => None,
        };
        if milestone.is_some() {
            out.milestone = milestone;
        }
    }

    if text_eq(name, &fields.difficulty) {
        match value {
            RawFieldValue::Number { number, .. } => {
                out.difficulty = rec.number(name, number.as_ref(), true);
            }
            RawFieldValue::SingleSelect { name: label, .. }
            | RawFieldValue::Text { text: label, .. } => {
                out.difficulty = rec.difficulty(name, label.as_deref());
            }
            _ => {}
        }
    }

    if text_eq(name, &fields.estimate) {
        match value {
            RawFieldValue::Number { number, .. } => {
                out.estimate_hours = rec.number(name, number.as_ref(), false);
            }
            RawFieldValue::SingleSelect { name: text, .. }
            | RawFieldValue::Text { text, .. } => {
                out.estimate_hours = rec.estimate(name, text.as_deref());
            }
            _ => {}
        }
    }
}

/// RFC 3339 timestamps (`Z` or offsets), or a bare date at midnight UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value.trim()) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Calendar dates, also accepting a full timestamp (its UTC date).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(value).map(|dt| dt.date_naive()))
}
