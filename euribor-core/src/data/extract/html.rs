//! HTML table extraction.
//!
//! Looks for the first `<table>` whose rows start with a date cell, falling
//! back to an empty table headed "Date". A rate under a date cell that does
//! not parse fails the month instead of being dropped.
//! The first cell of a row is the date, the second is the rate. Markup
//! around the table (wrappers, classes, extra columns, `%` suffixes) does
//! not matter.

use super::{is_blank_rate, reconcile_days, Observation, ParseError};
use crate::data::provider::RawDocument;
use crate::domain::{MonthRates, Rate, YearMonth};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

pub fn extract(doc: &RawDocument) -> Result<MonthRates, ParseError> {
    let period = doc.period;
    let html = Html::parse_document(&doc.body);

    let tables = selector(period, "table")?;
    let rows = selector(period, "tr")?;
    let cells = selector(period, "th, td")?;

    let parsed: Vec<Vec<Vec<String>>> = html
        .select(&tables)
        .map(|table| {
            table
                .select(&rows)
                .map(|row| row_cells(row, &cells))
                .collect()
        })
        .collect();

    // A table with dated rows wins over one that only has a header.
    let table = parsed
        .iter()
        .find(|table| table.iter().any(|row| row_date(row).is_some()))
        .or_else(|| parsed.iter().find(|table| has_date_header(table)))
        .ok_or_else(|| ParseError::DataRegionMissing {
            period,
            detail: "no table with dated rows".into(),
        })?;

    // Rates under a date we cannot read mean the layout changed.
    if let Some(row) = table.iter().find(|row| is_undated_rate_row(row)) {
        return Err(ParseError::Malformed {
            period,
            detail: format!("unrecognised date '{}' in rate table", row[0]),
        });
    }

    let observations: Vec<Observation> = table
        .iter()
        .filter_map(|row| {
            let date = row_date(row)?;
            let rate = row.get(1).filter(|text| !is_blank_rate(text)).cloned();
            Some((date, rate))
        })
        .collect();

    reconcile_days(period, observations)
}

fn selector(period: YearMonth, css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Malformed {
        period,
        detail: format!("selector '{css}': {e}"),
    })
}

/// Whitespace-normalised text of each cell in a row.
fn row_cells(row: ElementRef<'_>, cells: &Selector) -> Vec<String> {
    row.select(cells)
        .map(|cell| cell.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

fn row_date(row: &[String]) -> Option<NaiveDate> {
    row.first().and_then(|cell| parse_date(cell))
}

/// A header row whose first cell is `Date`.
fn has_date_header(table: &[Vec<String>]) -> bool {
    table
        .iter()
        .any(|row| row.first().is_some_and(|cell| cell.eq_ignore_ascii_case("date")))
}

/// A row carrying a rate whose first cell is not a date we understand.
fn is_undated_rate_row(row: &[String]) -> bool {
    row.len() >= 2
        && row_date(row).is_none()
        && !is_blank_rate(&row[1])
        && Rate::parse(&row[1]).is_ok()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text.trim(), fmt).ok())
}
