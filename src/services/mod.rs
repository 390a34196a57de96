//! Service layer for the tracker.
//!
//! This module contains the business logic for:
//! - Queries and aggregations over stored records (`QueryEngine`)
//! - Merging upstream data into storage (`Synchronizer`)
//! - Fetching upstream listings (`UpstreamFeed`, `MelangeFeed`)

pub mod feed;
mod query;
pub mod stats;
mod synchronizer;

pub use feed::{MelangeFeed, UpstreamFeed};
pub use query::{CategoryQuery, QueryEngine, TaskQuery};
pub use synchronizer::Synchronizer;
