use std::fmt::Display;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use now::DateTimeNow;
use thiserror::Error;

use super::entities::DayRecord;

#[derive(Debug, Error, PartialEq)]
pub enum RangeError {
    #[error("Start date {start} cannot be after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// Inclusive range of dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Records between `start` and `end`, both inclusive. If either bound is missing nothing is
/// filtered. Bounds aren't validated here: reversed bounds simply match nothing, so build them
/// through [DateRange::new] when they come from a user.
pub fn filter_range(
    records: &[DayRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> &[DayRecord] {
    let (Some(start), Some(end)) = (start, end) else {
        return records;
    };
    // records are sorted by date, so the matching ones are contiguous
    let from = records.partition_point(|v| v.date < start);
    let to = records.partition_point(|v| v.date <= end);
    if from >= to {
        return &[];
    }
    &records[from..to]
}

/// Same as [filter_range] for an already validated range.
pub fn filter_date_range(records: &[DayRecord], range: Option<DateRange>) -> &[DayRecord] {
    filter_range(records, range.map(|v| v.start()), range.map(|v| v.end()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Calendar week starting on Sunday.
    Weekly,
    /// Calendar month.
    Monthly,
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Weekly => write!(f, "This Week"),
            Period::Monthly => write!(f, "This Month"),
        }
    }
}

impl Period {
    /// Window of the period that contains `today`.
    pub fn window(&self, today: NaiveDate) -> DateRange {
        match self {
            Period::Weekly => {
                let start = today - Days::new(today.weekday().num_days_from_sunday().into());
                DateRange {
                    start,
                    end: start + Days::new(6),
                }
            }
            Period::Monthly => {
                let moment = today.and_time(NaiveTime::MIN).and_utc();
                DateRange {
                    start: moment.beginning_of_month().date_naive(),
                    end: moment.end_of_month().date_naive(),
                }
            }
        }
    }
}

/// Records falling into the current `period`, where "current" is decided by `today`.
pub fn select_period(records: &[DayRecord], period: Period, today: NaiveDate) -> &[DayRecord] {
    filter_date_range(records, Some(period.window(today)))
}

/// Records of `today` only. There is at most one in a merged dataset.
pub fn records_on(records: &[DayRecord], today: NaiveDate) -> &[DayRecord] {
    filter_range(records, Some(today), Some(today))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::screen_time::{
        entities::{RawDayEntry, UsageEntry},
        merge::merge_by_date,
    };

    use super::{
        filter_date_range, filter_range, records_on, select_period, DateRange, Period, RangeError,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(dates: &[&str]) -> crate::screen_time::entities::Dataset {
        merge_by_date(dates.iter().map(|v| RawDayEntry {
            date: v.to_string(),
            entries: vec![UsageEntry::new("Other", 1.)],
        }))
        .dataset
    }

    fn dates(records: &[crate::screen_time::entities::DayRecord]) -> Vec<NaiveDate> {
        records.iter().map(|v| v.date).collect()
    }

    #[test]
    fn range_is_inclusive() {
        let data = dataset(&["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]);
        let filtered = filter_range(&data, Some(date(2024, 1, 2)), Some(date(2024, 1, 3)));
        assert_eq!(dates(filtered), vec![date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[test]
    fn missing_bound_returns_everything() {
        let data = dataset(&["2024-01-01", "2024-01-02"]);
        assert_eq!(filter_range(&data, None, Some(date(2024, 1, 1))).len(), 2);
        assert_eq!(filter_range(&data, Some(date(2024, 1, 2)), None).len(), 2);
        assert_eq!(filter_date_range(&data, None).len(), 2);
    }

    #[test]
    fn reversed_bounds_are_rejected_by_constructor() {
        assert_eq!(
            DateRange::new(date(2024, 1, 5), date(2024, 1, 1)),
            Err(RangeError::StartAfterEnd {
                start: date(2024, 1, 5),
                end: date(2024, 1, 1)
            })
        );
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn reversed_bounds_passed_directly_match_nothing() {
        let data = dataset(&["2024-01-01", "2024-01-03", "2024-01-05"]);
        let filtered = filter_range(&data, Some(date(2024, 1, 5)), Some(date(2024, 1, 1)));
        assert!(filtered.is_empty());
    }

    #[test]
    fn weekly_window_starts_on_sunday() {
        // 2024-05-15 is a Wednesday
        let window = Period::Weekly.window(date(2024, 5, 15));
        assert_eq!(window.start(), date(2024, 5, 12));
        assert_eq!(window.end(), date(2024, 5, 18));

        let sunday = Period::Weekly.window(date(2024, 5, 12));
        assert_eq!(sunday.start(), date(2024, 5, 12));
        let saturday = Period::Weekly.window(date(2024, 5, 18));
        assert_eq!(saturday.start(), date(2024, 5, 12));
    }

    #[test]
    fn weekly_window_crosses_month_boundary() {
        // 2024-03-01 is a Friday
        let window = Period::Weekly.window(date(2024, 3, 1));
        assert_eq!(window.start(), date(2024, 2, 25));
        assert_eq!(window.end(), date(2024, 3, 2));
    }

    #[test]
    fn monthly_window_covers_whole_month() {
        let window = Period::Monthly.window(date(2024, 2, 10));
        assert_eq!(window.start(), date(2024, 2, 1));
        assert_eq!(window.end(), date(2024, 2, 29));

        let window = Period::Monthly.window(date(2023, 12, 31));
        assert_eq!(window.start(), date(2023, 12, 1));
        assert_eq!(window.end(), date(2023, 12, 31));
    }

    #[test]
    fn selects_current_period() {
        let data = dataset(&[
            "2024-04-30",
            "2024-05-01",
            "2024-05-11",
            "2024-05-12",
            "2024-05-18",
            "2024-05-19",
            "2024-06-01",
        ]);
        let today = date(2024, 5, 15);

        assert_eq!(
            dates(select_period(&data, Period::Weekly, today)),
            vec![date(2024, 5, 12), date(2024, 5, 18)]
        );
        assert_eq!(select_period(&data, Period::Monthly, today).len(), 5);
        assert!(records_on(&data, today).is_empty());
        assert_eq!(records_on(&data, date(2024, 5, 11)).len(), 1);
    }
}
