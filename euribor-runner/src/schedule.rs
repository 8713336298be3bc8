//! Work-item selection: which months a run should refresh.

use chrono::{DateTime, Datelike, Utc};
use euribor_core::{PeriodError, WorkItem, YearMonth};

/// What the caller asked for. With nothing set, the current month is refreshed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkSelection {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// Also refresh the month before the current one.
    pub previous: bool,
    /// Every year from the backfill start through the current year.
    pub backfill: bool,
}

impl WorkSelection {
    /// Resolve the selection against the run time.
    ///
    /// Backfill takes precedence over an explicit year or month. A month
    /// without a year refers to the current year. Items are ordered
    /// oldest first.
    pub fn work_items(
        &self,
        now: DateTime<Utc>,
        backfill_start_year: i32,
    ) -> Result<Vec<WorkItem>, PeriodError> {
        if self.backfill {
            return (backfill_start_year..=now.year())
                .map(WorkItem::year)
                .collect();
        }

        match (self.year, self.month) {
            (Some(year), Some(month)) => Ok(vec![WorkItem::month(year, month)?]),
            (Some(year), None) => Ok(vec![WorkItem::year(year)?]),
            (None, Some(month)) => Ok(vec![WorkItem::month(now.year(), month)?]),
            (None, None) => {
                let current = YearMonth::containing(now)?;
                let mut items = Vec::with_capacity(2);
                if self.previous {
                    if let Some(previous) = current.previous() {
                        items.push(WorkItem::Month(previous));
                    }
                }
                items.push(WorkItem::Month(current));
                Ok(items)
            }
        }
    }
}
