//! Chart-data JSON extraction.
//!
//! The endpoint answers with an array of series objects, each carrying a
//! `Data` array of `[timestamp_ms, value]` points. Timestamps are midnight
//! UTC of the fixing date; `value` is a JSON number or `null`.

use super::{reconcile_days, Observation, ParseError};
use crate::data::provider::RawDocument;
use crate::domain::{MonthRates, YearMonth};
use chrono::DateTime;
use serde_json::Value;

pub fn extract(doc: &RawDocument) -> Result<MonthRates, ParseError> {
    let period = doc.period;
    let root: Value = serde_json::from_str(&doc.body).map_err(|e| ParseError::Malformed {
        period,
        detail: format!("not JSON: {e}"),
    })?;

    let series = root
        .as_array()
        .filter(|series| !series.is_empty())
        .ok_or_else(|| ParseError::DataRegionMissing {
            period,
            detail: "expected a non-empty array of series".into(),
        })?;

    let mut observations = Vec::new();
    let mut found = false;
    for entry in series {
        // Accept both the capitalised key the endpoint uses and plain `data`.
        let Some(points) = entry
            .get("Data")
            .or_else(|| entry.get("data"))
            .and_then(Value::as_array)
        else {
            continue;
        };
        found = true;
        for point in points {
            observations.push(parse_point(period, point)?);
        }
    }

    if !found {
        return Err(ParseError::DataRegionMissing {
            period,
            detail: "no series carries a Data array".into(),
        });
    }

    reconcile_days(period, observations)
}

fn parse_point(period: YearMonth, point: &Value) -> Result<Observation, ParseError> {
    let malformed = |detail: String| ParseError::Malformed { period, detail };

    let pair = point
        .as_array()
        .filter(|p| p.len() >= 2)
        .ok_or_else(|| malformed(format!("expected [timestamp, value], got {point}")))?;

    let millis = pair[0]
        .as_i64()
        .or_else(|| pair[0].as_f64().map(|f| f as i64))
        .ok_or_else(|| malformed(format!("timestamp is not a number: {}", pair[0])))?;

    let date = DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| malformed(format!("timestamp out of range: {millis}")))?;

    let value = match &pair[1] {
        Value::Null => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if super::is_blank_rate(s) => None,
        Value::String(s) => Some(s.clone()),
        other => return Err(malformed(format!("unexpected value on {date}: {other}"))),
    };

    Ok((date, value))
}
