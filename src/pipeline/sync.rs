// src/pipeline/sync.rs

//! Upstream synchronization pipeline.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, SyncMode, SyncReport};
use crate::services::{Synchronizer, UpstreamFeed};
use crate::storage::RecordStore;

/// Run the synchronizer for `mode` and log a summary.
///
/// Returns the report even when some years failed; callers decide how to
/// surface [`SyncReport::failures`].
pub async fn run_sync(
    config: &Config,
    store: Arc<dyn RecordStore>,
    feed: Arc<dyn UpstreamFeed>,
    mode: SyncMode,
) -> Result<SyncReport> {
    let years = config.years()?;
    let synchronizer = Synchronizer::new(store, feed, years, &config.sync);

    log::info!(
        "Sync starting ({mode:?}): years {:?}",
        synchronizer.years_for(mode)
    );
    let report = synchronizer.run(mode).await;

    for year in &report.years {
        log::info!(
            "  {}: {}/{} organizations new, {}/{} tasks new",
            year.year,
            year.orgs_created,
            year.orgs_fetched,
            year.tasks_created,
            year.tasks_fetched
        );
    }
    for failure in &report.failures {
        log::error!("  {}: failed: {}", failure.year, failure.error);
    }

    let elapsed = report.end_time - report.start_time;
    log::info!(
        "Sync finished in {}s: {} organizations, {} tasks added",
        elapsed.num_seconds(),
        report.orgs_created(),
        report.tasks_created()
    );

    Ok(report)
}
