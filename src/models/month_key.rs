use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A budget period, written as `"YYYY-MM"`.
///
/// Ordering is chronological, which for the zero-padded string form is the
/// same as lexicographic ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct MonthKey {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid month '{0}'. Use YYYY-MM (e.g. 2025-03)")]
pub(crate) struct ParseMonthKeyError(pub(crate) String);

impl MonthKey {
    #[cfg(test)]
    pub(crate) fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub(crate) fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub(crate) fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    #[cfg(test)]
    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    #[cfg(test)]
    pub(crate) fn month(&self) -> u32 {
        self.month
    }

    pub(crate) fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub(crate) fn days_in_month(&self) -> u32 {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|d| d.pred_opt())
            .map_or(31, |d| d.day())
    }

    /// The date for `day` inside this month, clamped to the last valid day.
    /// e.g. day 31 in 2025-02 → 2025-02-28
    pub(crate) fn clamped_date(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_else(|| self.first_day())
    }

    /// Move by `months`, saturating at 0000-01 and 9999-12.
    pub(crate) fn offset(&self, months: i32) -> Self {
        const LAST: i32 = 9999 * 12 + 11;
        let index = (self.year * 12 + (self.month as i32 - 1))
            .saturating_add(months)
            .clamp(0, LAST);
        Self {
            year: index / 12,
            month: (index % 12) as u32 + 1,
        }
    }

    pub(crate) fn next(&self) -> Self {
        self.offset(1)
    }

    pub(crate) fn prev(&self) -> Self {
        self.offset(-1)
    }

    /// Returns true if `date` (YYYY-MM-DD) falls inside this month.
    #[cfg(test)]
    pub(crate) fn contains(&self, date: &str) -> bool {
        date.starts_with(&format!("{self}-"))
    }
}

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 7 || trimmed.as_bytes()[4] != b'-' {
            return Err(ParseMonthKeyError(s.to_string()));
        }
        // Validate by parsing as an actual date
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| ParseMonthKeyError(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ParseMonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
