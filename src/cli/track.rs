use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    api::DetoxApi,
    screen_time::entry_form::{EntryDraft, KNOWN_CATEGORIES},
    state::tracker::{ScreenTimeTracker, SubmitError},
};

use super::{output::notify_success, parse_date_arg, validation_error, DateStyle};

#[derive(Debug, Parser)]
pub struct TrackCommand {
    #[arg(
        long,
        short,
        help = "Day the entries belong to. Examples are \"yesterday\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(
        long = "entry",
        short,
        required = true,
        value_parser = parse_entry,
        help = format!("Time spent on a category as CATEGORY=HOURS, e.g. \"Social Media=1.5\". Repeat for more categories. Usual categories are {}", KNOWN_CATEGORIES.join(", "))
    )]
    entries: Vec<(String, f64)>,
}

fn parse_entry(value: &str) -> Result<(String, f64), String> {
    let (category, hours) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("Expected CATEGORY=HOURS, got {value:?}"))?;
    let hours = hours
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid hours {hours:?}: {e}"))?;
    Ok((category.trim().to_string(), hours))
}

pub async fn process_track_command(
    TrackCommand { date, entries }: TrackCommand,
    date_style: DateStyle,
    tracker: &mut ScreenTimeTracker<impl DetoxApi>,
) -> Result<()> {
    let date = match date {
        Some(v) => parse_date_arg(&v, date_style, tracker.time(), "date")?,
        None => tracker.today(),
    };

    let mut draft = EntryDraft::new();
    for (category, hours) in entries {
        draft.add(&category, hours).map_err(validation_error)?;
    }

    match tracker.submit(&draft, date).await {
        Ok(()) => {
            notify_success("Screen time data saved!");
            Ok(())
        }
        Err(SubmitError::Invalid(e)) => Err(validation_error(e)),
        Err(SubmitError::Api(e)) => Err(e).context("Error saving data."),
    }
}
