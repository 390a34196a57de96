//! Record storage for organizations and tasks.
//!
//! The store is a small document store: exact-match filters, insertion
//! order, `skip`/`limit` paging and single-record inserts. Nothing is ever
//! updated in place or deleted.
//!
//! Two backends are provided:
//! - [`MemoryStore`]: in-process collections, used by tests and dry runs
//! - [`LocalStorage`]: append-only JSON Lines files under a directory
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml           # Tracker configuration
//! ├── organizations.jsonl   # One Organization per line
//! └── tasks.jsonl           # One Task per line
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewOrganization, OrgId, Organization, Task};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStore;

/// Exact-match filter over organizations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgFilter {
    pub name: Option<String>,
    pub year: Option<i32>,
}

impl OrgFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn matches(&self, org: &Organization) -> bool {
        self.name.as_deref().is_none_or(|n| org.name == n)
            && self.year.is_none_or(|y| org.year == y)
    }
}

/// Exact-match filter over tasks, with paging.
///
/// `skip` is applied before `limit`, both after matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub key: Option<u64>,
    pub year: Option<i32>,
    pub org: Option<OrgId>,
    pub student: Option<String>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: u64) -> Self {
        self.key = Some(key);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn org(mut self, org: OrgId) -> Self {
        self.org = Some(org);
        self
    }

    pub fn student(mut self, student: impl Into<String>) -> Self {
        self.student = Some(student.into());
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.key.is_none_or(|k| task.key == k)
            && self.year.is_none_or(|y| task.year == y)
            && self.org.is_none_or(|o| task.org == o)
            && self.student.as_deref().is_none_or(|s| task.student == s)
    }

    /// Apply `skip` then `limit` to already-matched records.
    pub fn page<T>(&self, matched: impl Iterator<Item = T>) -> Vec<T> {
        let skipped = matched.skip(self.skip);
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

/// Trait for record storage backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Organizations matching the filter, in storage order.
    async fn find_organizations(&self, filter: &OrgFilter) -> Result<Vec<Organization>>;

    /// Resolve an organization reference.
    async fn get_organization(&self, id: OrgId) -> Result<Option<Organization>>;

    /// Store a new organization and return it with its assigned identity.
    async fn insert_organization(&self, org: NewOrganization) -> Result<Organization>;

    /// Tasks matching the filter, in storage order, paged.
    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Number of tasks matching the filter, ignoring paging.
    async fn count_tasks(&self, filter: &TaskFilter) -> Result<usize>;

    /// Store a new task. Fails if its key is already stored.
    async fn insert_task(&self, task: Task) -> Result<()>;

    /// First organization matching the filter.
    async fn find_organization(&self, filter: &OrgFilter) -> Result<Option<Organization>> {
        Ok(self.find_organizations(filter).await?.into_iter().next())
    }

    /// Task with the given key.
    async fn get_task(&self, key: u64) -> Result<Option<Task>> {
        let filter = TaskFilter::new().key(key).limit(1);
        Ok(self.find_tasks(&filter).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(key: u64, year: i32, org: u64, student: &str) -> Task {
        Task {
            key,
            year,
            org: OrgId(org),
            student: student.to_string(),
            title: format!("Task {key}"),
            categories: vec![],
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(TaskFilter::new().matches(&task(1, 2012, 1, "A")));
        let org = NewOrganization::new("orga", "", 2012).with_id(OrgId(1));
        assert!(OrgFilter::new().matches(&org));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filter = TaskFilter::new().year(2012).student("A").org(OrgId(1));
        assert!(filter.matches(&task(1, 2012, 1, "A")));
        assert!(!filter.matches(&task(2, 2011, 1, "A")));
        assert!(!filter.matches(&task(3, 2012, 2, "A")));
        assert!(!filter.matches(&task(4, 2012, 1, "B")));
    }

    #[test]
    fn test_org_filter_by_name_and_year() {
        let org = NewOrganization::new("orga", "Org A", 2011).with_id(OrgId(3));
        assert!(OrgFilter::new().name("orga").matches(&org));
        assert!(!OrgFilter::new().name("orga").year(2012).matches(&org));
        assert!(!OrgFilter::new().name("orgb").matches(&org));
    }

    #[test]
    fn test_page_skips_before_limit() {
        let filter = TaskFilter::new().skip(2).limit(2);
        assert_eq!(filter.page(0..10), vec![2, 3]);

        let filter = TaskFilter::new().skip(8).limit(5);
        assert_eq!(filter.page(0..10), vec![8, 9]);

        let filter = TaskFilter::new().skip(12);
        assert!(filter.page(0..10).is_empty());
    }
}
