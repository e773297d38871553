use std::fmt::Display;

use chrono::NaiveDate;
use thiserror::Error;

use crate::utils::percentage::{deviation_percentage, Percentage};

use super::{
    entities::{DayRecord, UsageEntry},
    limit::Limit,
    range::{records_on, select_period, Period},
};

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum StatsError {
    #[error("Screen limit not set")]
    LimitNotSet,
}

pub fn total_for_day(entries: &[UsageEntry]) -> f64 {
    entries.iter().map(|v| v.time_spent).sum()
}

/// Sum of every entry divided by the number of records. Zero when there are no records.
pub fn average_over_period(records: &[DayRecord]) -> f64 {
    if records.is_empty() {
        return 0.;
    }
    let total: f64 = records.iter().map(|v| total_for_day(v.entries())).sum();
    total / records.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdDirection {
    Above,
    Below,
}

impl Display for ThresholdDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdDirection::Above => write!(f, "above"),
            ThresholdDirection::Below => write!(f, "below"),
        }
    }
}

/// How an average compares to the limit. Displays as the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdReport {
    pub percentage: Percentage,
    pub direction: ThresholdDirection,
}

impl Display for ThresholdReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "You are {} {} the screen limit",
            self.percentage, self.direction
        )
    }
}

/// Compares `average` to `limit`. Being exactly at the limit counts as below. A limit of zero
/// means the user never set one, so there is nothing to compare against.
pub fn threshold_message(average: f64, limit: Limit) -> Result<ThresholdReport, StatsError> {
    let percentage = deviation_percentage(average, *limit).ok_or(StatsError::LimitNotSet)?;
    let direction = if average > *limit {
        ThresholdDirection::Above
    } else {
        ThresholdDirection::Below
    };
    Ok(ThresholdReport {
        percentage,
        direction,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub time_spent: f64,
}

/// Totals per category over every record, in the order categories were first seen.
pub fn category_totals(records: &[DayRecord]) -> Vec<CategoryTotal> {
    let mut totals = Vec::<CategoryTotal>::new();
    for entry in records.iter().flat_map(|v| v.entries()) {
        match totals.iter_mut().find(|v| v.category == entry.category) {
            Some(total) => total.time_spent += entry.time_spent,
            None => totals.push(CategoryTotal {
                category: entry.category.clone(),
                time_spent: entry.time_spent,
            }),
        }
    }
    totals
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: Period,
    pub days: usize,
    pub average: f64,
    pub threshold: Result<ThresholdReport, StatsError>,
}

impl PeriodSummary {
    fn new(records: &[DayRecord], period: Period, limit: Limit, today: NaiveDate) -> Self {
        let selected = select_period(records, period, today);
        let average = average_over_period(selected);
        Self {
            period,
            days: selected.len(),
            average,
            threshold: threshold_message(average, limit),
        }
    }
}

/// Everything the statistics view displays.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub today: NaiveDate,
    pub today_total: f64,
    pub weekly: PeriodSummary,
    pub monthly: PeriodSummary,
    pub categories: Vec<CategoryTotal>,
}

/// Daily, weekly and monthly statistics are relative to `today`. Category totals always cover
/// every record given.
pub fn summarize(records: &[DayRecord], limit: Limit, today: NaiveDate) -> Summary {
    Summary {
        today,
        today_total: records_on(records, today)
            .iter()
            .map(|v| total_for_day(v.entries()))
            .sum(),
        weekly: PeriodSummary::new(records, Period::Weekly, limit, today),
        monthly: PeriodSummary::new(records, Period::Monthly, limit, today),
        categories: category_totals(records),
    }
}
