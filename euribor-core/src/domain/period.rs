//! Calendar month addressing.
//!
//! Every fetch, parse and write in the pipeline is scoped to one `YearMonth`.
//! Years are restricted to four digits because they become path segments
//! (`api/daily/{YYYY}/...`).

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("month out of range: {0} (expected 1-12)")]
    MonthOutOfRange(u32),

    #[error("year out of range: {0} (expected 1000-9999)")]
    YearOutOfRange(i32),

    #[error("invalid period '{0}' (expected YYYY-MM)")]
    Unparseable(String),
}

/// A validated calendar month.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }
        let first =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::MonthOutOfRange(month))?;
        Ok(Self { first })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Result<Self, PeriodError> {
        Self::new(date.year(), date.month())
    }

    /// The month containing `now` (UTC).
    pub fn containing(now: DateTime<Utc>) -> Result<Self, PeriodError> {
        Self::from_date(now.date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Number of calendar days, accounting for leap-year February.
    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if is_leap_year(self.year()) => 29,
            _ => 28,
        }
    }

    /// Calendar date for `day` of this month, if it exists.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn next(&self) -> Option<Self> {
        match self.month() {
            12 => Self::new(self.year() + 1, 1).ok(),
            m => Self::new(self.year(), m + 1).ok(),
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self.month() {
            1 => Self::new(self.year() - 1, 12).ok(),
            m => Self::new(self.year(), m - 1).ok(),
        }
    }

    /// True when this month starts after the month containing `now`.
    pub fn is_after(&self, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        (self.year(), self.month()) > (today.year(), today.month())
    }

    /// Milliseconds since the epoch at 00:00 UTC on the first day.
    pub fn start_millis(&self) -> i64 {
        // NaiveDate::default() is 1970-01-01
        self.first.signed_duration_since(NaiveDate::default()).num_days() * MILLIS_PER_DAY
    }

    /// Milliseconds since the epoch at 00:00 UTC on the first day of the next month.
    pub fn end_millis(&self) -> i64 {
        self.start_millis() + i64::from(self.days_in_month()) * MILLIS_PER_DAY
    }

    /// Two-digit month key, as used in paths and yearly index keys.
    pub fn month_key(&self) -> String {
        format!("{:02}", self.month())
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || PeriodError::Unparseable(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(unparseable)?;
        let year: i32 = year.parse().map_err(|_| unparseable())?;
        let month: u32 = month.parse().map_err(|_| unparseable())?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
