use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// This is the standard way of converting a date to a string in unplug.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a date coming from the API. Both plain `2024-01-31` dates and full RFC 3339 timestamps
/// are accepted; for timestamps the UTC calendar date is used.
pub fn parse_api_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|v| v.with_timezone(&Utc).date_naive())
}

/// Midnight UTC of the date. This is how dates are sent to the API.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}h")
}
