use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::utils::time::start_of_day_utc;

use super::{entities::UsageEntry, stats::total_for_day};

pub const MAX_CATEGORIES: usize = 4;
pub const MAX_DAILY_HOURS: f64 = 24.;

/// Categories offered to the user. Others are accepted too.
pub const KNOWN_CATEGORIES: [&str; 4] = ["Social Media", "Productivity", "Entertainment", "Other"];

#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("Please enter a valid time spent.")]
    InvalidTime,
    #[error("Please enter a category.")]
    EmptyCategory,
    #[error("The category \"{0}\" has already been added.")]
    DuplicateCategory(String),
    #[error("You can only have a maximum of 4 categories.")]
    TooManyCategories,
    #[error("Total time spent cannot exceed 24 hours.")]
    DailyTotalExceeded,
    #[error("Please add at least one entry before submitting.")]
    Empty,
    #[error("Please select a valid past date.")]
    FutureDate,
    #[error("No entry at position {0}")]
    NoSuchEntry(usize),
}

/// Body of a screen-time submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub date: DateTime<Utc>,
    pub entries: Vec<UsageEntry>,
}

/// Entries collected for one day before they are sent. Every rejected change leaves the draft
/// untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EntryDraft {
    entries: Vec<UsageEntry>,
}

impl EntryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[UsageEntry] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        total_for_day(&self.entries)
    }

    pub fn add(&mut self, category: &str, time_spent: f64) -> Result<(), EntryError> {
        let category = category.trim();
        if !time_spent.is_finite() || time_spent <= 0. {
            return Err(EntryError::InvalidTime);
        }
        if category.is_empty() {
            return Err(EntryError::EmptyCategory);
        }
        if self.entries.iter().any(|v| v.category == category) {
            return Err(EntryError::DuplicateCategory(category.to_string()));
        }
        if self.total() + time_spent > MAX_DAILY_HOURS {
            return Err(EntryError::DailyTotalExceeded);
        }
        // categories are unique at this point, so the entry count is the category count
        if self.entries.len() >= MAX_CATEGORIES {
            return Err(EntryError::TooManyCategories);
        }
        self.entries.push(UsageEntry::new(category, time_spent));
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<UsageEntry, EntryError> {
        if index >= self.entries.len() {
            return Err(EntryError::NoSuchEntry(index));
        }
        Ok(self.entries.remove(index))
    }

    /// Checks the draft can be submitted for `date` and builds the request body.
    pub fn submission(&self, date: NaiveDate, today: NaiveDate) -> Result<Submission, EntryError> {
        if self.entries.is_empty() {
            return Err(EntryError::Empty);
        }
        if self.total() > MAX_DAILY_HOURS {
            return Err(EntryError::DailyTotalExceeded);
        }
        if date > today {
            return Err(EntryError::FutureDate);
        }
        Ok(Submission {
            date: start_of_day_utc(date),
            entries: self.entries.clone(),
        })
    }
}
