use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::utils::time::parse_api_date;

use super::entities::{Dataset, DayRecord, RawDayEntry};

/// Result of [merge_by_date]. Skipped counts are reported so callers can tell the user that part
/// of the data was unusable.
#[derive(Debug, Default, PartialEq)]
pub struct MergeOutcome {
    pub dataset: Dataset,
    pub skipped_days: usize,
    pub skipped_entries: usize,
}

/// Groups raw API days into a [Dataset].
///
/// Days are keyed by their parsed calendar date, so `2024-01-01` and `2024-01-01T00:00:00Z` end up
/// in the same record. Repeated categories within a date are summed. Days with an unparsable date
/// and entries that aren't [well formed](super::entities::UsageEntry::is_well_formed) are skipped.
pub fn merge_by_date(raw: impl IntoIterator<Item = RawDayEntry>) -> MergeOutcome {
    let mut grouped = BTreeMap::<NaiveDate, DayRecord>::new();
    let mut skipped_days = 0;
    let mut skipped_entries = 0;

    for RawDayEntry { date, entries } in raw {
        let Some(parsed) = parse_api_date(&date) else {
            warn!("Skipping day with malformed date {date:?}");
            skipped_days += 1;
            continue;
        };

        let record = grouped
            .entry(parsed)
            .or_insert_with(|| DayRecord::new(parsed));
        for entry in entries {
            if !entry.is_well_formed() {
                warn!("Skipping malformed entry {entry:?} on {parsed}");
                skipped_entries += 1;
                continue;
            }
            record.add(entry);
        }
    }

    debug!(
        "Merged into {} days, skipped {skipped_days} days and {skipped_entries} entries",
        grouped.len()
    );

    MergeOutcome {
        dataset: Dataset::from_sorted(grouped.into_values().collect()),
        skipped_days,
        skipped_entries,
    }
}
