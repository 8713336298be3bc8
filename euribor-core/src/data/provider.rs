//! Rate source trait and fetch error types.
//!
//! The `RateSource` trait abstracts over the upstream provider so the
//! pipeline can be driven by an in-memory source in tests.

use crate::domain::YearMonth;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Document shape returned by the upstream endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Chart-data JSON: `[{"Data": [[timestamp_ms, value], ...]}, ...]`.
    #[default]
    Highcharts,
    /// An HTML page with a `date | rate` table.
    Html,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highcharts => f.write_str("highcharts"),
            Self::Html => f.write_str("html"),
        }
    }
}

/// Raw upstream response body for one month.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub period: YearMonth,
    pub format: SourceFormat,
    pub body: String,
}

/// Network or HTTP failure for one month. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{period}: request timed out after {timeout_secs}s")]
    Timeout { period: YearMonth, timeout_secs: u64 },

    #[error("{period}: network unreachable: {reason}")]
    NetworkUnreachable { period: YearMonth, reason: String },

    #[error("{period}: upstream returned HTTP {status}")]
    HttpStatus { period: YearMonth, status: u16 },

    #[error("{period}: failed to read response body: {reason}")]
    Body { period: YearMonth, reason: String },

    #[error("{period}: could not build request: {reason}")]
    InvalidRequest { period: YearMonth, reason: String },
}

impl FetchError {
    pub fn period(&self) -> YearMonth {
        match self {
            Self::Timeout { period, .. }
            | Self::NetworkUnreachable { period, .. }
            | Self::HttpStatus { period, .. }
            | Self::Body { period, .. }
            | Self::InvalidRequest { period, .. } => *period,
        }
    }
}

/// Upstream provider of monthly rate documents.
///
/// Implementations issue exactly one request per call and never cache.
pub trait RateSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the raw document covering `period`.
    fn fetch(&self, period: YearMonth) -> Result<RawDocument, FetchError>;
}
