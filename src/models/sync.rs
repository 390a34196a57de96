// src/models/sync.rs

//! Synchronizer run modes and run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which configured years a sync run merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Only the active (maximum) year
    #[default]
    Active,
    /// Every year except the active one
    Archive,
    /// Archive years first, then the active year
    All,
}

/// Counters for one year's merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub orgs_fetched: usize,
    pub orgs_created: usize,
    pub tasks_fetched: usize,
    pub tasks_created: usize,
    pub tasks_skipped: usize,
}

impl YearReport {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }
}

/// A year whose merge was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearFailure {
    pub year: i32,
    pub error: String,
}

/// Outcome of a whole sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub mode: SyncMode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub years: Vec<YearReport>,
    pub failures: Vec<YearFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn orgs_created(&self) -> usize {
        self.years.iter().map(|y| y.orgs_created).sum()
    }

    pub fn tasks_created(&self) -> usize {
        self.years.iter().map(|y| y.tasks_created).sum()
    }
}
