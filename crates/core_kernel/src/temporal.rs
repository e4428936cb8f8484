//! Service-date handling
//!
//! Claims carry calendar dates (`NaiveDate`) for admission and discharge.
//! This module holds the fixed day windows used by benefit-period rules and
//! the proration window used to restrict a calculation to part of a year.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Window before an SNF admission in which a qualifying stay must end
pub const QUALIFYING_STAY_WINDOW: Days = Days::new(30);

/// Gap without a covered stay after which an Original Medicare benefit period closes
pub const BENEFIT_PERIOD_GAP: Days = Days::new(60);

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    #[error("Date arithmetic out of range: {0}")]
    OutOfRange(String),
}

/// A proration window: from the first day of `start_month` through December 31
/// of `claim_year`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProrationWindow {
    claim_year: i32,
    start_month: u32,
}

impl ProrationWindow {
    /// Creates a new window
    pub fn new(claim_year: i32, start_month: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&start_month) {
            return Err(TemporalError::InvalidMonth(start_month));
        }
        // Validates the year is representable
        NaiveDate::from_ymd_opt(claim_year, 12, 31).ok_or(TemporalError::InvalidYear(claim_year))?;
        Ok(Self { claim_year, start_month })
    }

    /// The full claim year
    pub fn full_year(claim_year: i32) -> Result<Self, TemporalError> {
        Self::new(claim_year, 1)
    }

    pub fn claim_year(&self) -> i32 {
        self.claim_year
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }

    /// Two-digit month label, as used by cost-map keys
    pub fn month_label(&self) -> String {
        format!("{:02}", self.start_month)
    }

    /// First day of the window
    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.claim_year, self.start_month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the window (inclusive)
    pub fn end(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.claim_year, 12, 31).unwrap_or(NaiveDate::MAX)
    }

    /// Returns true if the date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }
}

/// January 1 of the year after `date`
pub fn first_day_of_next_year(date: NaiveDate) -> Result<NaiveDate, TemporalError> {
    NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        .ok_or_else(|| TemporalError::OutOfRange(format!("year after {}", date)))
}

/// Returns true if both dates fall in the same calendar year
pub fn in_same_year(first: NaiveDate, second: NaiveDate) -> bool {
    first.year() == second.year()
}

/// Adds a day count to a date, failing instead of panicking on overflow
pub fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate, TemporalError> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| TemporalError::OutOfRange(format!("{} + {} days", date, days)))
}

/// Subtracts a day count from a date, saturating at the earliest representable date
pub fn sub_days_saturating(date: NaiveDate, days: Days) -> NaiveDate {
    date.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
}
