use super::period::{PeriodError, YearMonth};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A unit of processing: a whole year or a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkItem {
    Year(i32),
    Month(YearMonth),
}

impl WorkItem {
    pub fn year(year: i32) -> Result<Self, PeriodError> {
        YearMonth::new(year, 1)?;
        Ok(Self::Year(year))
    }

    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        Ok(Self::Month(YearMonth::new(year, month)?))
    }

    /// Months covered by this item, in ascending order.
    pub fn months(&self) -> Vec<YearMonth> {
        match self {
            Self::Year(year) => (1..=12)
                .filter_map(|m| YearMonth::new(*year, m).ok())
                .collect(),
            Self::Month(period) => vec![*period],
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year:04}"),
            Self::Month(period) => write!(f, "{period}"),
        }
    }
}

/// Accepts `YYYY` or `YYYY-MM`.
impl FromStr for WorkItem {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('-') {
            return Ok(Self::Month(s.parse()?));
        }
        let year = s
            .parse()
            .map_err(|_| PeriodError::Unparseable(s.to_string()))?;
        Self::year(year)
    }
}

impl Serialize for WorkItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
