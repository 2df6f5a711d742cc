use super::snapshot::StatusCell;
use crate::classify::is_completed;
use crate::error::{BurnupError, Result};
use crate::model::ProjectItem;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ISO week, Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub year: i32,
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    /// The week around `day`. Weeks cut by the calendar limits are clamped
    /// to [`NaiveDate::MIN`] and [`NaiveDate::MAX`].
    pub fn containing(day: NaiveDate) -> Self {
        let iso = day.iso_week();
        let offset = Days::new(u64::from(day.weekday().num_days_from_monday()));
        let start = day.checked_sub_days(offset).unwrap_or(NaiveDate::MIN);
        Self {
            year: iso.year(),
            week: iso.week(),
            start,
            end: start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
        }
    }

    /// The week before, or `self` for the first representable week.
    pub fn previous(&self) -> Self {
        match self.start.pred_opt() {
            Some(day) => Self::containing(day),
            None => *self,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekRange {
    type Err = BurnupError;

    fn from_str(s: &str) -> Result<Self> {
        parse_week_id(s).ok_or_else(|| BurnupError::InvalidWeek(s.to_string()))
    }
}

/// Parse `YYYY-Www` (for example `2024-W05`, or `2024-W5`). Returns `None`
/// for anything malformed or a week number the year does not have.
pub fn parse_week_id(id: &str) -> Option<WeekRange> {
    let (year, week) = id.trim().split_once("-W")?;
    if !(1..=2).contains(&week.len()) || !week.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let week: u32 = week.parse().ok()?;
    let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    Some(WeekRange {
        year,
        week,
        start,
        end: start.checked_add_days(Days::new(6))?,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub week: WeekRange,
    pub closed_this_week: StatusCell,
    pub closed_previous_week: StatusCell,
}

/// Work completed during `week` and the week before it.
pub fn weekly_progress(items: &[&ProjectItem], week: WeekRange) -> WeeklyProgress {
    let previous = week.previous();
    let mut closed_this_week = StatusCell::default();
    let mut closed_previous_week = StatusCell::default();

    for item in items.iter().filter(|item| is_completed(item)) {
        let day = item.status_day();
        if week.contains(day) {
            closed_this_week.add(item.weight());
        } else if previous.contains(day) {
            closed_previous_week.add(item.weight());
        }
    }

    WeeklyProgress {
        week,
        closed_this_week,
        closed_previous_week,
    }
}
