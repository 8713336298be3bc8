//! Rate extraction: raw upstream document → one `DailyRate` per calendar day.
//!
//! Each format-specific extractor only has to find the data region and yield
//! dated observations; `reconcile_days` maps those onto the canonical day
//! range of the month. Observations outside the month are ignored, days the
//! source does not list are absent, and a missing data region fails the whole
//! month.

pub mod highcharts;
pub mod html;

use super::provider::{RawDocument, SourceFormat};
use crate::domain::{MonthRates, Rate, YearMonth};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{period}: data region not found: {detail}")]
    DataRegionMissing { period: YearMonth, detail: String },

    #[error("{period}: malformed rate '{text}' on {date}")]
    MalformedRate {
        period: YearMonth,
        date: NaiveDate,
        text: String,
    },

    #[error("{period}: malformed document: {detail}")]
    Malformed { period: YearMonth, detail: String },
}

impl ParseError {
    pub fn period(&self) -> YearMonth {
        match self {
            Self::DataRegionMissing { period, .. }
            | Self::MalformedRate { period, .. }
            | Self::Malformed { period, .. } => *period,
        }
    }
}

/// Extract the daily rates of `doc.period` from an upstream document.
pub fn extract(doc: &RawDocument) -> Result<MonthRates, ParseError> {
    match doc.format {
        SourceFormat::Highcharts => highcharts::extract(doc),
        SourceFormat::Html => html::extract(doc),
    }
}

/// A dated value as found in the source, before validation.
pub(crate) type Observation = (NaiveDate, Option<String>);

/// Fold observations onto the calendar days of `period`.
///
/// The first observation for a day wins; later duplicates are logged and
/// dropped. Rates are only parsed for days inside the month.
pub(crate) fn reconcile_days(
    period: YearMonth,
    observations: impl IntoIterator<Item = Observation>,
) -> Result<MonthRates, ParseError> {
    let days = period.days_in_month() as usize;
    let mut slots: Vec<Option<Rate>> = vec![None; days];
    let mut seen = vec![false; days];

    for (date, text) in observations {
        if !period.contains(date) {
            continue;
        }
        let index = (date.day() - 1) as usize;
        if seen[index] {
            warn!(%period, %date, "duplicate observation, keeping the first");
            continue;
        }
        seen[index] = true;

        slots[index] = match text {
            None => None,
            Some(text) => Some(Rate::parse(&text).map_err(|_| ParseError::MalformedRate {
                period,
                date,
                text: text.clone(),
            })?),
        };
    }

    Ok(MonthRates::from_slots(period, slots))
}

/// Text that stands for "no rate published" in upstream tables.
pub(crate) fn is_blank_rate(text: &str) -> bool {
    matches!(
        text.trim().trim_end_matches('%').trim().to_ascii_lowercase().as_str(),
        "" | "-" | "\u{2013}" | "\u{2014}" | "n/a" | "na"
    )
}
