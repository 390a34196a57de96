// src/services/query.rs

//! Query and aggregation engine.
//!
//! Turns filter and paging parameters into task and organization listings,
//! student rankings and category statistics. The engine holds no mutable
//! state; every call reads the store afresh.
//!
//! Absence is an empty result everywhere except [`QueryEngine::task`], which
//! fails with the structured "Task not found" error.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{
    CategoryCounts, ContestYears, OrgId, Organization, OrganizationView, RankEntry, StudentStats,
    Task, TaskView, YearOrganizations,
};
use crate::services::stats::{count_categories, rank_students};
use crate::storage::{OrgFilter, RecordStore, TaskFilter};
use crate::utils::is_wildcard;

/// Parameters of a task listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskQuery {
    /// Defaults to the active year
    pub year: Option<i32>,
    /// Organization short name
    pub org: Option<String>,
    pub student: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Parameters of a category statistics query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryQuery {
    /// Defaults to the active year
    pub year: Option<i32>,
    /// Organization short name; absent or "all" means every organization
    pub org: Option<String>,
    pub student: Option<String>,
}

/// Read-side service over the record store.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn RecordStore>,
    years: ContestYears,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn RecordStore>, years: ContestYears) -> Self {
        Self { store, years }
    }

    pub fn years(&self) -> &ContestYears {
        &self.years
    }

    /// Organizations registered for a year (default: the active year).
    pub async fn list_organizations(&self, year: Option<i32>) -> Result<Vec<OrganizationView>> {
        let year = self.years.resolve(year);
        let orgs = self
            .store
            .find_organizations(&OrgFilter::new().year(year))
            .await?;
        Ok(orgs.iter().map(OrganizationView::from).collect())
    }

    /// Organizations grouped by every configured year, in configured order.
    pub async fn list_organizations_by_year(&self) -> Result<Vec<YearOrganizations>> {
        try_join_all(self.years.all().iter().map(|&year| async move {
            Ok::<_, AppError>(YearOrganizations {
                year,
                orgs: self.list_organizations(Some(year)).await?,
            })
        }))
        .await
    }

    /// Organization registrations matching name and year.
    ///
    /// An unknown organization yields an empty list, not an error.
    pub async fn organization(&self, name: &str, year: i32) -> Result<Vec<OrganizationView>> {
        let orgs = self
            .store
            .find_organizations(&OrgFilter::new().name(name).year(year))
            .await?;
        Ok(orgs.iter().map(OrganizationView::from).collect())
    }

    /// Tasks matching the query, `offset` applied before `limit`.
    pub async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<TaskView>> {
        let year = self.years.resolve(query.year);
        let Some(mut filter) = self.scope(year, query.org.as_deref(), false).await? else {
            return Ok(Vec::new());
        };

        if let Some(student) = &query.student {
            filter = filter.student(student.as_str());
        }
        filter = filter.skip(query.offset.unwrap_or(0));
        if let Some(limit) = query.limit {
            filter = filter.limit(limit);
        }

        let tasks = self.store.find_tasks(&filter).await?;
        self.views(&tasks).await
    }

    /// A single task by key.
    pub async fn task(&self, key: u64) -> Result<TaskView> {
        let task = self
            .store
            .get_task(key)
            .await?
            .ok_or_else(|| AppError::task_not_found(key))?;
        let org = self.resolve_org(&task).await?;
        Ok(TaskView::new(&task, org.as_ref()))
    }

    /// Students of an organization (or "all") ranked by completed tasks.
    pub async fn ranking(&self, name: &str, year: i32) -> Result<Vec<RankEntry>> {
        let Some(filter) = self.scope(year, Some(name), true).await? else {
            return Ok(Vec::new());
        };
        let tasks = self.store.find_tasks(&filter).await?;
        Ok(rank_students(&tasks))
    }

    /// Category occurrence counts over the selected tasks.
    pub async fn category_stats(&self, query: &CategoryQuery) -> Result<CategoryCounts> {
        let year = self.years.resolve(query.year);
        let Some(mut filter) = self.scope(year, query.org.as_deref(), true).await? else {
            return Ok(CategoryCounts::new());
        };
        if let Some(student) = &query.student {
            filter = filter.student(student.as_str());
        }

        let tasks = self.store.find_tasks(&filter).await?;
        Ok(count_categories(&tasks))
    }

    /// A student's tasks and category counts in a year.
    ///
    /// An organization that does not resolve yields empty stats.
    pub async fn student_stats(
        &self,
        student: &str,
        year: i32,
        org: Option<&str>,
    ) -> Result<StudentStats> {
        let tasks = match self.scope(year, org, false).await? {
            Some(filter) => self.store.find_tasks(&filter.student(student)).await?,
            None => Vec::new(),
        };

        Ok(StudentStats {
            name: student.to_string(),
            categories: count_categories(&tasks),
            tasks: self.views(&tasks).await?,
        })
    }

    /// Task filter for a year, narrowed to one organization unless `org` is
    /// absent (or the wildcard, where `wildcard` allows it). `None` when the
    /// organization does not exist.
    async fn scope(
        &self,
        year: i32,
        org: Option<&str>,
        wildcard: bool,
    ) -> Result<Option<TaskFilter>> {
        let filter = TaskFilter::new().year(year);
        let name = match org {
            Some(name) if wildcard && is_wildcard(name) => return Ok(Some(filter)),
            Some(name) => name,
            None => return Ok(Some(filter)),
        };

        let org = self
            .store
            .find_organization(&OrgFilter::new().name(name).year(year))
            .await?;
        match org {
            Some(org) => Ok(Some(filter.org(org.id))),
            None => {
                log::debug!("No organization '{name}' in {year}");
                Ok(None)
            }
        }
    }

    async fn resolve_org(&self, task: &Task) -> Result<Option<Organization>> {
        let org = self.store.get_organization(task.org).await?;
        if org.is_none() {
            log::warn!(
                "Task {} references missing organization {}",
                task.key,
                task.org
            );
        }
        Ok(org)
    }

    /// Serialize tasks, resolving each distinct organization once.
    async fn views(&self, tasks: &[Task]) -> Result<Vec<TaskView>> {
        let mut orgs: HashMap<OrgId, Option<Organization>> = HashMap::new();
        let mut views = Vec::with_capacity(tasks.len());

        for task in tasks {
            if !orgs.contains_key(&task.org) {
                let org = self.resolve_org(task).await?;
                orgs.insert(task.org, org);
            }
            views.push(TaskView::new(task, orgs[&task.org].as_ref()));
        }

        Ok(views)
    }
}
