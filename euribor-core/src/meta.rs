//! `last_modified` tracking for published values.
//!
//! The file tree keeps only "current value + time of last change" per entry.
//! Reconciliation compares the freshly computed value with the previously
//! published one and carries the old timestamp over when nothing changed.
//! The same rule applies to daily entries and monthly averages.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Metadata attached to every published value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    /// `YYYY-MM-DD` for daily entries, `YYYY-MM` for monthly ones.
    pub full_date: String,
    /// When `value` last changed (RFC 3339, UTC).
    pub last_modified: String,
}

/// One entry of a yearly or monthly index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub value: Option<String>,
    #[serde(rename = "_meta")]
    pub meta: MetaRecord,
}

/// How a new value relates to what was published before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Nothing was published for this entry yet.
    New,
    /// Same value as before (absent vs. absent included).
    Unchanged,
    /// Value appeared, disappeared, or differs.
    Changed,
}

impl Change {
    pub fn classify(prior: Option<&IndexEntry>, value: Option<&str>) -> Self {
        match prior {
            None => Self::New,
            Some(prior) if prior.value.as_deref() == value => Self::Unchanged,
            Some(_) => Self::Changed,
        }
    }
}

/// Canonical rendering of `last_modified` timestamps.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the entry to publish for `value`, preserving `last_modified` from
/// `prior` when the value did not change.
pub fn reconcile(
    prior: Option<&IndexEntry>,
    value: Option<&str>,
    full_date: &str,
    now: DateTime<Utc>,
) -> IndexEntry {
    let last_modified = match (Change::classify(prior, value), prior) {
        (Change::Unchanged, Some(prior)) => prior.meta.last_modified.clone(),
        _ => format_timestamp(now),
    };
    IndexEntry {
        value: value.map(str::to_string),
        meta: MetaRecord {
            full_date: full_date.to_string(),
            last_modified,
        },
    }
}
