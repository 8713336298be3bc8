//! Per-item outcomes and the run summary.

use euribor_core::meta::format_timestamp;
use euribor_core::{WriteReport, YearMonth};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// What a report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// One month: daily files, monthly file, monthly index.
    Month(YearMonth),
    /// The yearly index refreshed at the end of a year item.
    YearIndex(i32),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(period) => write!(f, "{period}"),
            Self::YearIndex(year) => write!(f, "{year:04} index"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Succeeded,
    Skipped { reason: String },
    Failed { error: String },
}

/// Result of processing one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub target: Target,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
    pub written: usize,
    pub unchanged: usize,
    pub removed: usize,
}

impl ItemReport {
    pub fn skipped(target: Target, reason: impl Into<String>) -> Self {
        Self::with_outcome(
            target,
            ItemOutcome::Skipped {
                reason: reason.into(),
            },
        )
    }

    pub fn failed(target: Target, error: impl fmt::Display) -> Self {
        Self::with_outcome(
            target,
            ItemOutcome::Failed {
                error: error.to_string(),
            },
        )
    }

    /// Report for a target whose files were written. The counts are taken
    /// from `writes`; the outcome is left to the caller.
    pub(crate) fn from_writes(target: Target, writes: &WriteReport, outcome: ItemOutcome) -> Self {
        Self {
            target,
            outcome,
            written: writes.written,
            unchanged: writes.unchanged,
            removed: writes.removed,
        }
    }

    fn with_outcome(target: Target, outcome: ItemOutcome) -> Self {
        Self {
            target,
            outcome,
            written: 0,
            unchanged: 0,
            removed: 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Failed { .. })
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_at: String,
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub written: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            run_at: format_timestamp(now),
            total: 0,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            written: 0,
            unchanged: 0,
            removed: 0,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, report: ItemReport) {
        self.total += 1;
        match report.outcome {
            ItemOutcome::Succeeded => self.succeeded += 1,
            ItemOutcome::Skipped { .. } => self.skipped += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
        }
        self.written += report.written;
        self.unchanged += report.unchanged;
        self.removed += report.removed;
        self.items.push(report);
    }

    /// True when no item failed. Skipped items and an empty run count as success.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> + '_ {
        self.items.iter().filter(|r| r.is_failed())
    }

    pub fn get(&self, target: Target) -> Option<&ItemReport> {
        self.items.iter().find(|r| r.target == target)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
