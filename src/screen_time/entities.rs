use std::ops::Deref;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

/// Time spent on a single category during one day. Time is measured in hours.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct UsageEntry {
    pub category: String,
    #[serde(rename = "timeSpent")]
    pub time_spent: f64,
}

impl UsageEntry {
    pub fn new(category: impl Into<String>, time_spent: f64) -> Self {
        Self {
            category: category.into(),
            time_spent,
        }
    }

    /// Entries with an empty category or a time that isn't a non-negative number are dropped
    /// during merging.
    pub fn is_well_formed(&self) -> bool {
        !self.category.trim().is_empty() && self.time_spent.is_finite() && self.time_spent >= 0.
    }
}

/// A day exactly as the API reports it. The same date may show up in several of these and the
/// same category may repeat within them.
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct RawDayEntry {
    pub date: String,
    #[serde(default)]
    pub entries: Vec<UsageEntry>,
}

/// All usage for one calendar date. Categories are unique within a record.
#[derive(PartialEq, Debug, Clone)]
pub struct DayRecord {
    pub date: NaiveDate,
    entries: Vec<UsageEntry>,
}

impl DayRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[UsageEntry] {
        &self.entries
    }

    pub fn time_for(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|v| v.category == category)
            .map(|v| v.time_spent)
    }

    /// Adds time to the entry of the same category or appends a new one.
    ///
    /// Lookup is a linear scan. A day holds at most a handful of categories so this never matters,
    /// but keep that in mind before reusing it for anything unbounded.
    pub fn add(&mut self, entry: UsageEntry) {
        match self.entries.iter_mut().find(|v| v.category == entry.category) {
            Some(existing) => existing.time_spent += entry.time_spent,
            None => self.entries.push(entry),
        }
    }

    pub fn with_entries(mut self, entries: impl IntoIterator<Item = UsageEntry>) -> Self {
        for entry in entries {
            self.add(entry);
        }
        self
    }
}

/// Every [DayRecord] of a user, sorted by date with at most one record per date. The only way to
/// build one is [merge_by_date](super::merge::merge_by_date), so the ordering always holds.
#[derive(PartialEq, Debug, Default, Clone)]
pub struct Dataset(Vec<DayRecord>);

impl Dataset {
    pub(super) fn from_sorted(records: Vec<DayRecord>) -> Self {
        debug_assert!(records.windows(2).all(|v| v[0].date < v[1].date));
        Self(records)
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.0
    }
}

impl Deref for Dataset {
    type Target = [DayRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
