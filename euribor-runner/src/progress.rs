//! Run progress observation.

use crate::summary::{ItemOutcome, ItemReport, RunSummary};
use euribor_core::WorkItem;
use tracing::{info, warn};

/// Observer for a running pipeline.
pub trait RunProgress: Send + Sync {
    /// Called before a work item is processed.
    fn on_start(&self, item: &WorkItem, index: usize, total: usize);

    /// Called for every target finished (a year item yields several).
    fn on_complete(&self, report: &ItemReport);

    /// Called once after the last item.
    fn on_batch_complete(&self, summary: &RunSummary);
}

/// Progress reporter that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl RunProgress for LogProgress {
    fn on_start(&self, item: &WorkItem, index: usize, total: usize) {
        info!(%item, "[{}/{}] processing", index + 1, total);
    }

    fn on_complete(&self, report: &ItemReport) {
        let target = report.target;
        match &report.outcome {
            ItemOutcome::Succeeded => info!(
                %target,
                written = report.written,
                unchanged = report.unchanged,
                removed = report.removed,
                "ok"
            ),
            ItemOutcome::Skipped { reason } => info!(%target, reason = %reason, "skipped"),
            ItemOutcome::Failed { error } => warn!(%target, error = %error, "failed"),
        }
    }

    fn on_batch_complete(&self, summary: &RunSummary) {
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            written = summary.written,
            "run complete"
        );
    }
}

/// Progress reporter that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl RunProgress for NoProgress {
    fn on_start(&self, _item: &WorkItem, _index: usize, _total: usize) {}
    fn on_complete(&self, _report: &ItemReport) {}
    fn on_batch_complete(&self, _summary: &RunSummary) {}
}
