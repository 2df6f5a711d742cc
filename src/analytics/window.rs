use crate::model::ProjectItem;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date range of a burn-up plus the cutoff used by snapshot tables.
///
/// Always satisfies `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cutoff: NaiveDate,
}

impl Window {
    /// Number of days in `[start, end]`, both inclusive.
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    /// Every calendar day of the window, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take(self.len_days()).collect()
    }
}

/// Resolve the window for a set of eligible items.
///
/// The end is the earliest milestone due date among the items, else the
/// reference date. The start is the earliest creation day, unless that is
/// missing or after the end, in which case the window is the
/// `fallback_days` before the end. Returns `None` when there are no items.
pub fn resolve_window(
    items: &[&ProjectItem],
    reference: NaiveDate,
    fallback_days: i64,
) -> Option<Window> {
    if items.is_empty() {
        return None;
    }

    let end = items
        .iter()
        .filter_map(|item| item.milestone_due())
        .min()
        .unwrap_or(reference);

    let fallback_start = Duration::try_days(fallback_days.max(0))
        .and_then(|span| end.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);
    let start = match items.iter().map(|item| item.created_day()).min() {
        Some(earliest) if earliest <= end => earliest,
        _ => fallback_start,
    };

    let window = Window {
        start,
        end,
        cutoff: reference,
    };
    tracing::debug!(
        start = %window.start,
        end = %window.end,
        cutoff = %window.cutoff,
        "Resolved burn-up window"
    );
    Some(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Milestone;
    use chrono::{TimeZone, Utc};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn item(month: u32, day: u32) -> ProjectItem {
        ProjectItem::new(
            format!("{month}-{day}"),
            Utc.with_ymd_and_hms(2024, month, day, 15, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_items_have_no_window() {
        assert_eq!(resolve_window(&[], date(3, 1), 30), None);
    }

    #[test]
    fn test_window_from_creation_to_reference() {
        let a = item(3, 4);
        let b = item(3, 2);
        let window = resolve_window(&[&a, &b], date(3, 10), 30).unwrap();
        assert_eq!(window.start, date(3, 2));
        assert_eq!(window.end, date(3, 10));
        assert_eq!(window.cutoff, date(3, 10));
        assert_eq!(window.len_days(), 9);
        assert_eq!(window.dates().len(), 9);
        assert_eq!(window.dates().first(), Some(&date(3, 2)));
        assert_eq!(window.dates().last(), Some(&date(3, 10)));
    }

    #[test]
    fn test_earliest_milestone_due_date_ends_window() {
        let a = item(3, 1).with_milestone(Some(Milestone::new("A").with_due_date(date(3, 20))));
        let b = item(3, 2).with_milestone(Some(Milestone::new("B").with_due_date(date(3, 15))));
        let c = item(3, 3).with_milestone(Some(Milestone::new("C")));
        let window = resolve_window(&[&a, &b, &c], date(4, 1), 30).unwrap();
        assert_eq!(window.end, date(3, 15));
        assert_eq!(window.cutoff, date(4, 1));
    }

    #[test]
    fn test_start_after_end_falls_back() {
        let a = item(3, 20);
        let window = resolve_window(&[&a], date(3, 10), 30).unwrap();
        assert_eq!(window.end, date(3, 10));
        assert_eq!(window.start, date(2, 9));
        assert!(window.start <= window.end);
        assert_eq!(window.len_days(), 31);
    }

    #[test]
    fn test_huge_fallback_clamps_to_calendar_start() {
        let a = item(3, 20);
        let window = resolve_window(&[&a], date(3, 10), 1_000_000_000).unwrap();
        assert_eq!(window.start, NaiveDate::MIN);
        assert_eq!(window.end, date(3, 10));

        let window = resolve_window(&[&a], date(3, 10), i64::MAX).unwrap();
        assert_eq!(window.start, NaiveDate::MIN);
    }
}
