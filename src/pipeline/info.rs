// src/pipeline/info.rs

//! Storage summary for the `info` command.

use serde::Serialize;

use crate::error::Result;
use crate::models::Config;
use crate::storage::{OrgFilter, RecordStore, TaskFilter};

/// Stored record counts for one configured year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub active: bool,
    pub organizations: usize,
    pub tasks: usize,
}

/// Count stored organizations and tasks per configured year.
pub async fn run_info(config: &Config, store: &dyn RecordStore) -> Result<Vec<YearSummary>> {
    let years = config.years()?;
    let mut summaries = Vec::with_capacity(years.all().len());

    for &year in years.all() {
        let organizations = store
            .find_organizations(&OrgFilter::new().year(year))
            .await?
            .len();
        let tasks = store.count_tasks(&TaskFilter::new().year(year)).await?;

        log::info!(
            "{year}{}: {organizations} organizations, {tasks} tasks",
            if year == years.active() { " (active)" } else { "" }
        );
        summaries.push(YearSummary {
            year,
            active: year == years.active(),
            organizations,
            tasks,
        });
    }

    Ok(summaries)
}
