// src/services/synchronizer.rs

//! Incremental synchronizer.
//!
//! Merges organization and task listings from the upstream feed into the
//! record store. The merge is additive only: a record that already exists
//! is skipped, never updated, so re-running a year is safe.
//!
//! Failures are not caught per record. A fetch or parse error aborts the
//! year being merged and whatever was written before it stays written.

use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{
    ContestYears, FeedOrganization, NewOrganization, OrgMatch, Organization, SyncConfig, SyncMode,
    SyncReport, Task, YearFailure, YearReport,
};
use crate::services::UpstreamFeed;
use crate::storage::{OrgFilter, RecordStore};

/// Service merging upstream data into the record store.
pub struct Synchronizer {
    store: Arc<dyn RecordStore>,
    feed: Arc<dyn UpstreamFeed>,
    years: ContestYears,
    org_match: OrgMatch,
}

impl Synchronizer {
    pub fn new(
        store: Arc<dyn RecordStore>,
        feed: Arc<dyn UpstreamFeed>,
        years: ContestYears,
        config: &SyncConfig,
    ) -> Self {
        Self {
            store,
            feed,
            years,
            org_match: config.org_match,
        }
    }

    /// Years merged by a mode, in merge order.
    ///
    /// `All` merges archive years first so the active year lands last.
    pub fn years_for(&self, mode: SyncMode) -> Vec<i32> {
        match mode {
            SyncMode::Active => vec![self.years.active()],
            SyncMode::Archive => self.years.archive(),
            SyncMode::All => {
                let mut years = self.years.archive();
                years.push(self.years.active());
                years
            }
        }
    }

    /// Merge every year selected by `mode`, one at a time.
    ///
    /// A failed year is recorded in the report and the run moves on.
    pub async fn run(&self, mode: SyncMode) -> SyncReport {
        let start_time = Utc::now();
        let mut years = Vec::new();
        let mut failures = Vec::new();

        for year in self.years_for(mode) {
            match self.sync_year(year).await {
                Ok(report) => years.push(report),
                Err(e) => {
                    log::error!("Sync of {year} aborted: {e}");
                    failures.push(YearFailure {
                        year,
                        error: e.to_string(),
                    });
                }
            }
        }

        SyncReport {
            mode,
            start_time,
            end_time: Utc::now(),
            years,
            failures,
        }
    }

    /// Merge one contest year.
    pub async fn sync_year(&self, year: i32) -> Result<YearReport> {
        let mut report = YearReport::new(year);

        log::info!("Getting list of the organizations for {year}");
        let fetched = self.feed.fetch_organizations(year).await?;
        report.orgs_fetched = fetched.len();
        log::info!("Got {} organizations", fetched.len());

        for fetched_org in &fetched {
            let org = self.resolve_org(fetched_org, year, &mut report).await?;
            self.merge_tasks(&org, year, &mut report).await?;
        }

        log::info!(
            "Year {year}: {} new organizations, {} new tasks, {} already stored",
            report.orgs_created,
            report.tasks_created,
            report.tasks_skipped
        );
        Ok(report)
    }

    /// Find the stored organization for a feed entry, creating it if absent.
    async fn resolve_org(
        &self,
        fetched: &FeedOrganization,
        year: i32,
        report: &mut YearReport,
    ) -> Result<Organization> {
        let filter = match self.org_match {
            OrgMatch::NameAndYear => OrgFilter::new().name(fetched.org_id.as_str()).year(year),
            OrgMatch::Name => OrgFilter::new().name(fetched.org_id.as_str()),
        };

        if let Some(org) = self.store.find_organization(&filter).await? {
            return Ok(org);
        }

        let org = self
            .store
            .insert_organization(NewOrganization::new(
                fetched.org_id.as_str(),
                fetched.name.as_str(),
                year,
            ))
            .await?;
        log::debug!("Added organization {} ({year})", org.name);
        report.orgs_created += 1;
        Ok(org)
    }

    /// Insert the organization's tasks that are not stored yet.
    async fn merge_tasks(&self, org: &Organization, year: i32, report: &mut YearReport) -> Result<()> {
        log::info!("Getting {year}/{}", org.name);
        let fetched = self.feed.fetch_tasks(&org.name, year).await?;
        report.tasks_fetched += fetched.len();
        log::info!("Got {} tasks", fetched.len());

        for fetched_task in fetched {
            if self.store.get_task(fetched_task.key).await?.is_some() {
                report.tasks_skipped += 1;
                continue;
            }

            let categories = fetched_task.categories();
            self.store
                .insert_task(Task {
                    key: fetched_task.key,
                    year,
                    org: org.id,
                    student: fetched_task.student,
                    title: fetched_task.title,
                    categories,
                })
                .await?;
            report.tasks_created += 1;
        }

        Ok(())
    }
}
