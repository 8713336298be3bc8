//! Euribor Core — the stages of the scrape → average → publish pipeline.
//!
//! This crate contains everything that touches one month of data:
//! - Domain types (periods, rates, work items)
//! - Upstream fetching behind the `RateSource` trait
//! - Extraction of daily rates from chart JSON or HTML tables
//! - Monthly averaging with an explicit rounding policy
//! - `last_modified` reconciliation against previously published entries
//! - The static file tree writer (plain values + JSON indexes)
//!
//! Orchestration across many months lives in `euribor-runner`.

pub mod aggregate;
pub mod data;
pub mod domain;
pub mod meta;
pub mod store;

pub use aggregate::{average, mean, PUBLISHED_SCALE};
pub use data::{extract, FetchError, HttpSource, HttpSourceConfig, ParseError, RateSource, RawDocument, SourceFormat};
pub use domain::{DailyRate, MonthRates, MonthlyAverage, PeriodError, Rate, RateParseError, WorkItem, YearMonth};
pub use meta::{reconcile, Change, IndexEntry, MetaRecord};
pub use store::{FileTree, WriteError, WriteReport};
