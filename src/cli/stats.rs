use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;

use crate::{
    api::DetoxApi,
    screen_time::range::DateRange,
    state::tracker::ScreenTimeTracker,
};

use super::{
    output::{notify_warning, print_records, print_summary},
    parse_date_arg, validation_error, DateStyle,
};

#[derive(Debug, Parser)]
pub struct StatsCommand {
    #[arg(
        long = "start",
        short,
        help = "Start of the range of days to list. Examples are \"yesterday\", \"15/03/2025\", \"last monday\""
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "End of the range of days to list. Examples are \"today\", \"15/03/2025\""
    )]
    end_date: Option<String>,
}

/// Command to process `stats` command. Lists merged days, optionally limited to a range, followed
/// by statistics over all days.
pub async fn process_stats_command(
    StatsCommand {
        start_date,
        end_date,
    }: StatsCommand,
    date_style: DateStyle,
    tracker: &mut ScreenTimeTracker<impl DetoxApi>,
) -> Result<()> {
    // validated before anything is fetched
    let range = parse_range(start_date, end_date, date_style, tracker.time())?;

    if let Err(e) = tracker.refresh_limit().await {
        notify_warning(format!(
            "Couldn't load the screen limit, using {}: {e}",
            tracker.limit()
        ));
    }

    let report = tracker
        .refresh()
        .await
        .context("Failed to fetch screen time")?;
    if report.skipped_days > 0 || report.skipped_entries > 0 {
        notify_warning(format!(
            "Ignored {} days with invalid dates and {} invalid entries",
            report.skipped_days, report.skipped_entries
        ));
    }

    print_records(&tracker.records(range));
    print_summary(&tracker.summary());
    Ok(())
}

fn parse_range(
    start_date: Option<String>,
    end_date: Option<String>,
    date_style: DateStyle,
    now: NaiveDateTime,
) -> Result<Option<DateRange>> {
    let start = start_date
        .map(|v| parse_date_arg(&v, date_style, now, "start date"))
        .transpose()?;
    let end = end_date
        .map(|v| parse_date_arg(&v, date_style, now, "end date"))
        .transpose()?;

    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end)
            .map(Some)
            .map_err(validation_error),
        (None, None) => Ok(None),
        _ => {
            notify_warning("Both --start and --end are needed to filter, showing every day");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::parse_range;
    use crate::cli::DateStyle;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 25)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn relative_dates_follow_the_given_time() {
        let range = parse_range(
            Some("yesterday".into()),
            Some("today".into()),
            DateStyle::Uk,
            now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(range.start().to_string(), "2025-03-24");
        assert_eq!(range.end().to_string(), "2025-03-25");
    }

    #[test]
    fn reversed_range_is_rejected() {
        let result = parse_range(
            Some("20/03/2025".into()),
            Some("15/03/2025".into()),
            DateStyle::Uk,
            now(),
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("cannot be after"), "{message}");
    }

    #[test]
    fn us_dialect_swaps_day_and_month() {
        let range = parse_range(
            Some("03/15/2025".into()),
            Some("03/20/2025".into()),
            DateStyle::Us,
            now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(range.start().to_string(), "2025-03-15");
        assert_eq!(range.end().to_string(), "2025-03-20");
    }

    #[test]
    fn single_bound_disables_filtering() {
        assert_eq!(
            parse_range(Some("15/03/2025".into()), None, DateStyle::Uk, now()).unwrap(),
            None
        );
    }
}
