//! Pipeline orchestrator: fetch → extract → average → publish, per month.
//!
//! Items are processed strictly in order, one month at a time. A failing
//! month is recorded and the run moves on; nothing is written for a month
//! whose fetch or extraction failed, so the tree keeps its prior state.

use crate::progress::RunProgress;
use crate::summary::{ItemOutcome, ItemReport, RunSummary, Target};
use chrono::{DateTime, Utc};
use euribor_core::{
    average, extract, FetchError, FileTree, MonthlyAverage, ParseError, RateSource, WorkItem,
    WriteError, WriteReport, YearMonth,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Why one target failed.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{target}: {} file(s) not written, first: {}", .errors.len(), first_error(.errors))]
    Write {
        target: Target,
        errors: Vec<WriteError>,
    },
}

fn first_error(errors: &[WriteError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

/// Drives a `RateSource` into a `FileTree`.
pub struct Pipeline<'a> {
    source: &'a dyn RateSource,
    tree: &'a FileTree,
    progress: &'a dyn RunProgress,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn RateSource, tree: &'a FileTree, progress: &'a dyn RunProgress) -> Self {
        Self {
            source,
            tree,
            progress,
        }
    }

    /// Process every item in order. Never fails as a whole; per-target
    /// outcomes are in the returned summary.
    pub fn run(&self, items: &[WorkItem], now: DateTime<Utc>) -> RunSummary {
        let total = items.len();
        let mut summary = RunSummary::new(now);

        for (i, item) in items.iter().enumerate() {
            self.progress.on_start(item, i, total);
            let reports = match item {
                WorkItem::Month(period) => vec![self.run_month(*period, now)],
                WorkItem::Year(year) => self.run_year(*year, now),
            };
            for report in reports {
                self.progress.on_complete(&report);
                summary.push(report);
            }
        }

        self.progress.on_batch_complete(&summary);
        summary
    }

    /// A month item: the month itself plus its entry in the yearly index.
    pub fn run_month(&self, period: YearMonth, now: DateTime<Utc>) -> ItemReport {
        let target = Target::Month(period);
        if period.is_after(now) {
            return ItemReport::skipped(target, "future month");
        }

        match self.refresh_month(period, now) {
            Ok((avg, mut writes)) => {
                writes.absorb(self.tree.write_year_index(period.year(), &[avg], now));
                finish(target, writes)
            }
            Err(e) => {
                warn!(%period, error = %e, "month left untouched");
                ItemReport::failed(target, e)
            }
        }
    }

    /// A year item: twelve month reports, then one report for the yearly
    /// index built from the months that were refreshed.
    pub fn run_year(&self, year: i32, now: DateTime<Utc>) -> Vec<ItemReport> {
        let mut reports = Vec::with_capacity(13);
        let mut refreshed = Vec::new();

        for period in WorkItem::Year(year).months() {
            let target = Target::Month(period);
            if period.is_after(now) {
                reports.push(ItemReport::skipped(target, "future month"));
                continue;
            }
            match self.refresh_month(period, now) {
                Ok((avg, writes)) => {
                    refreshed.push(avg);
                    reports.push(finish(target, writes));
                }
                Err(e) => {
                    warn!(%period, error = %e, "month left untouched");
                    reports.push(ItemReport::failed(target, e));
                }
            }
        }

        let target = Target::YearIndex(year);
        if refreshed.is_empty() {
            reports.push(ItemReport::skipped(target, "no month refreshed"));
        } else {
            reports.push(finish(target, self.tree.write_year_index(year, &refreshed, now)));
        }
        reports
    }

    /// Fetch, extract, average and publish one month. The yearly index is
    /// left to the caller.
    fn refresh_month(
        &self,
        period: YearMonth,
        now: DateTime<Utc>,
    ) -> Result<(MonthlyAverage, WriteReport), ItemError> {
        let doc = self.source.fetch(period)?;
        let rates = extract(&doc)?;
        let avg = average(&rates);
        debug!(
            %period,
            source = self.source.name(),
            present = rates.present_count(),
            average = avg.value.as_ref().map(|r| r.as_str()).unwrap_or("-"),
            "extracted"
        );
        let writes = self.tree.write_month(&rates, &avg, now);
        Ok((avg, writes))
    }
}

/// Turn a write report into an item report; any per-file error fails the target.
fn finish(target: Target, mut writes: WriteReport) -> ItemReport {
    let errors = std::mem::take(&mut writes.errors);
    let outcome = if errors.is_empty() {
        ItemOutcome::Succeeded
    } else {
        ItemOutcome::Failed {
            error: ItemError::Write { target, errors }.to_string(),
        }
    };
    ItemReport::from_writes(target, &writes, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use chrono::TimeZone;
    use euribor_core::{RawDocument, SourceFormat};

    struct Fixed;

    impl RateSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, period: YearMonth) -> Result<RawDocument, FetchError> {
            let ms = period.start_millis();
            Ok(RawDocument {
                period,
                format: SourceFormat::Highcharts,
                body: format!("[{{\"Data\":[[{ms},3.500]]}}]"),
            })
        }
    }

    #[test]
    fn month_item_refreshes_its_yearly_entry() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FileTree::new(dir.path());
        let pipeline = Pipeline::new(&Fixed, &tree, &NoProgress);
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 6, 0, 0).unwrap();
        let may = YearMonth::new(2024, 5).unwrap();

        let report = pipeline.run_month(may, now);
        assert_eq!(report.outcome, ItemOutcome::Succeeded);

        let year = tree.load_year_index(2024).unwrap().unwrap();
        assert_eq!(year["05"].value.as_deref(), Some("3.500"));
    }

    #[test]
    fn write_errors_fail_the_target_with_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x");
        let errors = vec![WriteError::Io {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }];
        let report = finish(
            Target::YearIndex(2024),
            WriteReport {
                written: 2,
                errors,
                ..Default::default()
            },
        );
        assert!(report.is_failed());
        assert_eq!(report.written, 2);
        match report.outcome {
            ItemOutcome::Failed { error } => {
                assert!(error.starts_with("2024 index: 1 file(s) not written"));
                assert!(error.contains("denied"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
