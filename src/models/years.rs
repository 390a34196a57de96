// src/models/years.rs

//! The set of recognized contest years.

use serde::Serialize;

use crate::error::{AppError, Result};

/// Immutable set of configured contest years.
///
/// The active year is the maximum; every other year is an archive year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestYears {
    years: Vec<i32>,
    active: i32,
}

impl ContestYears {
    /// Build from the configured list, keeping its order.
    pub fn new(years: Vec<i32>) -> Result<Self> {
        let active = years
            .iter()
            .copied()
            .max()
            .ok_or_else(|| AppError::config("contest.years must not be empty"))?;

        for (i, year) in years.iter().enumerate() {
            if years[..i].contains(year) {
                return Err(AppError::config(format!(
                    "contest.years lists {year} more than once"
                )));
            }
        }

        Ok(Self { years, active })
    }

    /// All years in configured order.
    pub fn all(&self) -> &[i32] {
        &self.years
    }

    pub fn active(&self) -> i32 {
        self.active
    }

    /// Archive years, oldest first.
    pub fn archive(&self) -> Vec<i32> {
        let mut archive: Vec<i32> = self
            .years
            .iter()
            .copied()
            .filter(|&y| y != self.active)
            .collect();
        archive.sort_unstable();
        archive
    }

    /// The requested year, or the active year when none was given.
    pub fn resolve(&self, year: Option<i32>) -> i32 {
        year.unwrap_or(self.active)
    }

    pub fn info(&self) -> YearsInfo {
        YearsInfo {
            years: self.years.clone(),
            active: self.active,
        }
    }
}

/// Read-only view of the year configuration for API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearsInfo {
    pub years: Vec<i32>,
    pub active: i32,
}
