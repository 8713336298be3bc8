//! Euribor Runner — run orchestration on top of `euribor-core`.
//!
//! This crate provides:
//! - The sequential pipeline over work items (`Pipeline`)
//! - Work-item selection (current month, previous month, year, backfill)
//! - TOML run configuration
//! - Per-item outcomes and the run summary
//! - Progress observation

pub mod config;
pub mod pipeline;
pub mod progress;
pub mod schedule;
pub mod summary;

pub use config::{ConfigError, PipelineConfig, SourceConfig, DEFAULT_BACKFILL_START_YEAR};
pub use pipeline::{ItemError, Pipeline};
pub use progress::{LogProgress, NoProgress, RunProgress};
pub use schedule::WorkSelection;
pub use summary::{ItemOutcome, ItemReport, RunSummary, Target};
