// src/models/task.rs

//! Task records and the aggregates computed over them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{OrgId, Organization};

/// A completed contest task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Upstream identifier, unique across all years
    pub key: u64,

    pub year: i32,

    /// Owning organization, resolved through the store on read
    pub org: OrgId,

    /// Student who completed the task (free text, not an identity)
    pub student: String,

    pub title: String,

    #[serde(default)]
    pub categories: Vec<String>,
}

/// Task as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: u64,
    pub title: String,

    /// `None` when the owning organization no longer resolves
    pub org_name: Option<String>,

    pub year: i32,
    pub student: String,
    pub categories: Vec<String>,
}

impl TaskView {
    pub fn new(task: &Task, org: Option<&Organization>) -> Self {
        Self {
            id: task.key,
            title: task.title.clone(),
            org_name: org.map(|o| o.name.clone()),
            year: task.year,
            student: task.student.clone(),
            categories: task.categories.clone(),
        }
    }
}

/// Category name to number of tasks carrying it, in first-seen order.
pub type CategoryCounts = IndexMap<String, usize>;

/// One line of a student ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub student: String,
    pub tasks: usize,
}

impl RankEntry {
    pub fn new(student: impl Into<String>, tasks: usize) -> Self {
        Self {
            student: student.into(),
            tasks,
        }
    }
}

/// Everything known about one student in a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStats {
    pub name: String,
    pub tasks: Vec<TaskView>,
    pub categories: CategoryCounts,
}
