// src/models/mod.rs

//! Domain models for the tracker.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod feed;
mod organization;
mod sync;
mod task;
mod years;

// Re-export all public types
pub use config::{Config, ContestConfig, FeedConfig, OrgMatch, ServerConfig, SyncConfig};
pub use feed::{FeedOrganization, FeedTask, parse_rows, split_categories};
pub use organization::{NewOrganization, OrgId, Organization, OrganizationView, YearOrganizations};
pub use sync::{SyncMode, SyncReport, YearFailure, YearReport};
pub use task::{CategoryCounts, RankEntry, StudentStats, Task, TaskView};
pub use years::{ContestYears, YearsInfo};
