//! Text and status normalization.
//!
//! Trackers encode workflow status and effort as free text in whatever
//! language the team speaks. Everything here is total: no input makes these
//! functions fail, so downstream sums are always defined.

use crate::model::WorkflowState;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Status keyword table, evaluated top to bottom. The first row with a
/// keyword contained in the status wins, so cancellation and duplication
/// beat any lifecycle keyword that co-occurs with them.
pub const STATUS_RULES: &[(WorkflowState, &[&str])] = &[
    (WorkflowState::Cancelled, &["cancel"]),
    (WorkflowState::Duplicate, &["duplicate", "duplicado"]),
    (WorkflowState::Done, &["done", "concl", "closed", "finalizado"]),
    (WorkflowState::Review, &["review", "revis", "qa"]),
    (WorkflowState::Progress, &["progress", "andamento", "doing", "wip"]),
    (WorkflowState::Blocked, &["blocked", "bloqueado", "imped"]),
    (
        WorkflowState::Backlog,
        &["backlog", "todo", "pendente", "to do", "ready", "planning"],
    ),
];

/// Ordinal effort scales, matched by prefix in this order.
pub const DIFFICULTY_SCALE: &[(&str, f64)] = &[
    ("XS", 1.0),
    ("S", 2.0),
    ("M", 3.0),
    ("L", 4.0),
    ("XL", 5.0),
    ("P0", 5.0),
    ("P1", 4.0),
    ("P2", 3.0),
    ("P3", 2.0),
    ("P4", 1.0),
];

static NUMERIC_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").expect("numeric literal regex is valid"));

static WHOLE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:[.,]\d+)?$").expect("whole number regex is valid"));

/// Fold to base letters, lower-case and trim: `"  Concluído "` -> `"concluido"`.
pub fn normalize_text(value: &str) -> String {
    value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Normalized containment: does `value` contain `target`?
///
/// Empty values or targets never match.
pub fn text_contains(value: &str, target: &str) -> bool {
    let target = normalize_text(target);
    if target.is_empty() {
        return false;
    }
    let value = normalize_text(value);
    !value.is_empty() && value.contains(&target)
}

/// Normalized equality, used for custom-field name matching.
pub fn text_eq(a: &str, b: &str) -> bool {
    normalize_text(a) == normalize_text(b)
}

/// Map a free-text tracker status to its workflow state.
///
/// Empty input is `no_status`; text matching no keyword is `backlog`.
pub fn classify_status(raw: &str) -> WorkflowState {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return WorkflowState::NoStatus;
    }
    STATUS_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(state, _)| *state)
        .unwrap_or(WorkflowState::Backlog)
}

/// First embedded numeric literal, accepting `.` or `,` as decimal separator.
pub fn parse_numeric(value: &str) -> f64 {
    NUMERIC_LITERAL
        .find(value)
        .map(|m| to_f64(m.as_str()))
        .unwrap_or(0.0)
}

/// Map an effort label to a numeric weight. Never fails; unknown labels are 0.
///
/// Pure numbers win, then the ordinal scales by prefix, then any number
/// embedded in the label.
pub fn map_difficulty(label: Option<&str>) -> f64 {
    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        return 0.0;
    };
    if WHOLE_NUMBER.is_match(label) {
        return to_f64(label);
    }
    let upper = label.to_uppercase();
    DIFFICULTY_SCALE
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, weight)| *weight)
        .unwrap_or_else(|| parse_numeric(label))
}

fn to_f64(literal: &str) -> f64 {
    let value = literal.replace(',', ".").parse::<f64>().unwrap_or(0.0);
    if value.is_finite() { value } else { 0.0 }
}
