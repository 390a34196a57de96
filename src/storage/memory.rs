//! In-memory storage implementation.
//!
//! `Collections` is also the read model behind [`LocalStorage`], which
//! replays its files into one.
//!
//! [`LocalStorage`]: crate::storage::LocalStorage

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{NewOrganization, OrgId, Organization, Task};
use crate::storage::{OrgFilter, RecordStore, TaskFilter};

/// Organizations and tasks in storage order, with key indexes.
#[derive(Debug, Clone, Default)]
pub(crate) struct Collections {
    orgs: Vec<Organization>,
    tasks: Vec<Task>,
    org_index: HashMap<OrgId, usize>,
    task_index: HashMap<u64, usize>,
    next_org_id: u64,
}

impl Collections {
    /// Next unused organization identity.
    pub(crate) fn next_org_id(&self) -> OrgId {
        OrgId(self.next_org_id.max(1))
    }

    pub(crate) fn contains_org(&self, id: OrgId) -> bool {
        self.org_index.contains_key(&id)
    }

    pub(crate) fn contains_task(&self, key: u64) -> bool {
        self.task_index.contains_key(&key)
    }

    /// Add an organization. Returns `false` if its identity is taken.
    pub(crate) fn push_org(&mut self, org: Organization) -> bool {
        if self.contains_org(org.id) {
            return false;
        }
        self.next_org_id = self.next_org_id.max(org.id.0 + 1);
        self.org_index.insert(org.id, self.orgs.len());
        self.orgs.push(org);
        true
    }

    /// Add a task. Returns `false` if its key is taken.
    pub(crate) fn push_task(&mut self, task: Task) -> bool {
        if self.contains_task(task.key) {
            return false;
        }
        self.task_index.insert(task.key, self.tasks.len());
        self.tasks.push(task);
        true
    }

    pub(crate) fn find_orgs(&self, filter: &OrgFilter) -> Vec<Organization> {
        self.orgs
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect()
    }

    pub(crate) fn get_org(&self, id: OrgId) -> Option<Organization> {
        self.org_index.get(&id).map(|&i| self.orgs[i].clone())
    }

    pub(crate) fn find_tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        filter.page(self.matching_tasks(filter).cloned())
    }

    pub(crate) fn count_tasks(&self, filter: &TaskFilter) -> usize {
        self.matching_tasks(filter).count()
    }

    fn matching_tasks<'a>(&'a self, filter: &'a TaskFilter) -> Box<dyn Iterator<Item = &'a Task> + 'a> {
        match filter.key {
            // Keys are unique, so the index narrows the scan to one record.
            Some(key) => Box::new(
                self.task_index
                    .get(&key)
                    .map(|&i| &self.tasks[i])
                    .into_iter()
                    .filter(move |t| filter.matches(t)),
            ),
            None => Box::new(self.tasks.iter().filter(move |t| filter.matches(t))),
        }
    }
}

/// In-process storage backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_organizations(&self, filter: &OrgFilter) -> Result<Vec<Organization>> {
        Ok(self.collections.read().await.find_orgs(filter))
    }

    async fn get_organization(&self, id: OrgId) -> Result<Option<Organization>> {
        Ok(self.collections.read().await.get_org(id))
    }

    async fn insert_organization(&self, org: NewOrganization) -> Result<Organization> {
        let mut collections = self.collections.write().await;
        let org = org.with_id(collections.next_org_id());
        collections.push_org(org.clone());
        Ok(org)
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self.collections.read().await.find_tasks(filter))
    }

    async fn count_tasks(&self, filter: &TaskFilter) -> Result<usize> {
        Ok(self.collections.read().await.count_tasks(filter))
    }

    async fn insert_task(&self, task: Task) -> Result<()> {
        let key = task.key;
        if !self.collections.write().await.push_task(task) {
            return Err(AppError::validation(format!("task {key} is already stored")));
        }
        Ok(())
    }
}
