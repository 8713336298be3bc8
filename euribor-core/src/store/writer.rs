//! Publishing months and years into the file tree.
//!
//! Every index entry goes through `meta::reconcile` against what is already
//! on disk, so re-publishing identical data yields byte-identical files.
//! A failure on one file is recorded and the remaining files are still
//! attempted.

use super::index::{self, IndexDocument};
use super::{remove_if_exists, write_if_changed, FileChange, FileTree, WriteError};
use crate::domain::{MonthRates, MonthlyAverage, Rate, WorkItem, YearMonth};
use crate::meta::reconcile;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of publishing a set of files.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub errors: Vec<WriteError>,
}

impl WriteReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold another report into this one.
    pub fn absorb(&mut self, other: WriteReport) {
        self.written += other.written;
        self.unchanged += other.unchanged;
        self.removed += other.removed;
        self.errors.extend(other.errors);
    }

    fn record(&mut self, result: Result<FileChange, WriteError>) {
        match result {
            Ok(FileChange::Written) => self.written += 1,
            Ok(FileChange::Unchanged) => self.unchanged += 1,
            Ok(FileChange::Removed) => self.removed += 1,
            Err(e) => {
                warn!(path = %e.path().display(), error = %e, "file not published");
                self.errors.push(e);
            }
        }
    }
}

impl FileTree {
    /// Publish one month: a plain file per published day, the plain monthly
    /// average, and the monthly index covering every calendar day.
    ///
    /// Days (or an average) that are absent have their plain file removed.
    pub fn write_month(
        &self,
        rates: &MonthRates,
        average: &MonthlyAverage,
        now: DateTime<Utc>,
    ) -> WriteReport {
        let period = rates.period();
        let mut report = WriteReport::default();

        for daily in rates.days() {
            let path = self.daily_path(period, daily.day);
            report.record(write_value(&path, daily.value.as_ref()));
        }
        report.record(write_value(
            &self.monthly_path(period),
            average.value.as_ref(),
        ));
        report.record(self.write_month_index(rates, now));

        debug!(
            %period,
            written = report.written,
            unchanged = report.unchanged,
            removed = report.removed,
            "month published"
        );
        report
    }

    /// Refresh the yearly index of `year`.
    ///
    /// Months in `updates` are reconciled against the prior index. Other
    /// months keep their prior entry; a month with no prior entry is seeded
    /// from its plain monthly file, or `null` if there is none.
    pub fn write_year_index(
        &self,
        year: i32,
        updates: &[MonthlyAverage],
        now: DateTime<Utc>,
    ) -> WriteReport {
        let mut report = WriteReport::default();
        report.record(self.try_write_year_index(year, updates, now));
        report
    }

    pub fn load_year_index(&self, year: i32) -> Result<Option<IndexDocument>, WriteError> {
        index::load(&self.year_index_path(year))
    }

    pub fn load_month_index(&self, period: YearMonth) -> Result<Option<IndexDocument>, WriteError> {
        index::load(&self.month_index_path(period))
    }

    fn write_month_index(
        &self,
        rates: &MonthRates,
        now: DateTime<Utc>,
    ) -> Result<FileChange, WriteError> {
        let period = rates.period();
        let path = self.month_index_path(period);
        let prior = index::load(&path)?.unwrap_or_default();

        let doc: IndexDocument = rates
            .days()
            .iter()
            .map(|daily| {
                let key = daily.key();
                let full_date = format!("{period}-{key}");
                let value = daily.value.as_ref().map(Rate::as_str);
                let entry = reconcile(prior.get(&key), value, &full_date, now);
                (key, entry)
            })
            .collect();

        write_if_changed(&path, &index::render(&path, &doc)?)
    }

    fn try_write_year_index(
        &self,
        year: i32,
        updates: &[MonthlyAverage],
        now: DateTime<Utc>,
    ) -> Result<FileChange, WriteError> {
        let path = self.year_index_path(year);
        let prior = index::load(&path)?.unwrap_or_default();

        let mut doc = IndexDocument::new();
        for period in WorkItem::Year(year).months() {
            let key = period.month_key();
            let full_date = period.to_string();
            let entry = match updates.iter().find(|avg| avg.period == period) {
                Some(avg) => reconcile(
                    prior.get(&key),
                    avg.value.as_ref().map(Rate::as_str),
                    &full_date,
                    now,
                ),
                None => match prior.get(&key) {
                    Some(existing) => existing.clone(),
                    None => {
                        let seeded = self.read_value(&self.monthly_path(period))?;
                        reconcile(None, seeded.as_deref(), &full_date, now)
                    }
                },
            };
            doc.insert(key, entry);
        }

        write_if_changed(&path, &index::render(&path, &doc)?)
    }
}

fn write_value(path: &Path, value: Option<&Rate>) -> Result<FileChange, WriteError> {
    match value {
        Some(rate) => write_if_changed(path, rate.as_str().as_bytes()),
        None => remove_if_exists(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::average;
    use chrono::TimeZone;
    use std::fs;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 6, 0, 0).unwrap()
    }

    fn may(values: &[(u32, &str)]) -> MonthRates {
        let period = YearMonth::new(2024, 5).unwrap();
        let mut slots = vec![None; 31];
        for (day, v) in values {
            slots[*day as usize - 1] = Some(Rate::parse(v).unwrap());
        }
        MonthRates::from_slots(period, slots)
    }

    #[test]
    fn write_month_publishes_plain_files_and_full_index() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FileTree::new(dir.path());
        let rates = may(&[(2, "3.700"), (3, "3.710")]);

        let report = tree.write_month(&rates, &average(&rates), at(1));
        assert!(report.is_clean());

        let period = rates.period();
        assert_eq!(fs::read_to_string(tree.daily_path(period, 2)).unwrap(), "3.700");
        assert!(!tree.daily_path(period, 1).exists());
        assert_eq!(fs::read_to_string(tree.monthly_path(period)).unwrap(), "3.705");

        let index = tree.load_month_index(period).unwrap().unwrap();
        assert_eq!(index.len(), 31);
        assert_eq!(index["02"].value.as_deref(), Some("3.700"));
        assert_eq!(index["01"].value, None);
        assert_eq!(index["31"].meta.full_date, "2024-05-31");
    }

    #[test]
    fn republishing_identical_data_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FileTree::new(dir.path());
        let rates = may(&[(2, "3.700")]);
        let avg = average(&rates);

        tree.write_month(&rates, &avg, at(1));
        let index_path = tree.month_index_path(rates.period());
        let before = fs::read(&index_path).unwrap();

        let report = tree.write_month(&rates, &avg, at(9));
        assert_eq!(report.written, 0);
        assert_eq!(report.removed, 0);
        assert_eq!(fs::read(&index_path).unwrap(), before);
    }

    #[test]
    fn present_to_absent_removes_daily_file() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FileTree::new(dir.path());
        let period = YearMonth::new(2024, 5).unwrap();

        let first = may(&[(2, "3.700"), (3, "3.710")]);
        tree.write_month(&first, &average(&first), at(1));
        assert!(tree.daily_path(period, 3).exists());

        let revised = may(&[(2, "3.700")]);
        let report = tree.write_month(&revised, &average(&revised), at(2));
        assert_eq!(report.removed, 1);
        assert!(!tree.daily_path(period, 3).exists());

        let index = tree.load_month_index(period).unwrap().unwrap();
        assert_eq!(index["03"].value, None);
        assert_eq!(index["03"].meta.last_modified, "2024-06-02T06:00:00Z");
        assert_eq!(index["02"].meta.last_modified, "2024-06-01T06:00:00Z");
    }

    #[test]
    fn year_index_always_has_twelve_months() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FileTree::new(dir.path());
        let rates = may(&[(2, "3.700")]);

        let report = tree.write_year_index(2024, &[average(&rates)], at(1));
        assert!(report.is_clean());

        let index = tree.load_year_index(2024).unwrap().unwrap();
        assert_eq!(index.len(), 12);
        assert_eq!(index["05"].value.as_deref(), Some("3.700"));
        assert_eq!(index["05"].meta.full_date, "2024-05");
        assert_eq!(index["01"].value, None);
    }

    #[test]
    fn year_index_keeps_untouched_months_and_seeds_from_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FileTree::new(dir.path());
        let march = YearMonth::new(2024, 3).unwrap();
        fs::create_dir_all(tree.monthly_path(march).parent().unwrap()).unwrap();
        fs::write(tree.monthly_path(march), "3.850").unwrap();

        let may_rates = may(&[(2, "3.700")]);
        tree.write_year_index(2024, &[average(&may_rates)], at(1));
        let index = tree.load_year_index(2024).unwrap().unwrap();
        assert_eq!(index["03"].value.as_deref(), Some("3.850"));

        // A later refresh of a different month leaves May's timestamp alone.
        let june = MonthlyAverage {
            period: YearMonth::new(2024, 6).unwrap(),
            value: Some(Rate::parse("3.650").unwrap()),
        };
        tree.write_year_index(2024, &[june], at(20));
        let index = tree.load_year_index(2024).unwrap().unwrap();
        assert_eq!(index["05"].meta.last_modified, "2024-06-01T06:00:00Z");
        assert_eq!(index["06"].meta.last_modified, "2024-06-20T06:00:00Z");
        assert_eq!(index["06"].value.as_deref(), Some("3.650"));
    }

    #[test]
    fn write_failure_is_recorded_and_other_files_still_attempted() {
        let dir = tempfile::tempdir().unwrap();
        let tree = FileTree::new(dir.path());
        let period = YearMonth::new(2024, 5).unwrap();

        // A directory where the day-2 file should go makes that one write fail.
        fs::create_dir_all(tree.daily_path(period, 2)).unwrap();
        fs::write(tree.daily_path(period, 2).join("blocker"), "x").unwrap();

        let rates = may(&[(2, "3.700"), (3, "3.710")]);
        let report = tree.write_month(&rates, &average(&rates), at(1));

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path(), tree.daily_path(period, 2));
        assert_eq!(fs::read_to_string(tree.daily_path(period, 3)).unwrap(), "3.710");
        assert!(tree.month_index_path(period).exists());
    }
}
