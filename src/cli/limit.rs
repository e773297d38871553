use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::{api::DetoxApi, screen_time::limit::Limit, state::tracker::ScreenTimeTracker};

use super::output::notify_success;

#[derive(Debug, Parser)]
pub struct LimitCommand {
    #[command(subcommand)]
    action: Option<LimitAction>,
}

#[derive(Debug, Subcommand)]
enum LimitAction {
    #[command(about = "Store a new daily limit")]
    Set {
        #[arg(help = "Hours per day, e.g. 6 or 4.5")]
        hours: Limit,
    },
}

pub async fn process_limit_command(
    LimitCommand { action }: LimitCommand,
    tracker: &mut ScreenTimeTracker<impl DetoxApi>,
) -> Result<()> {
    match action {
        None => {
            let limit = tracker
                .refresh_limit()
                .await
                .context("Failed to fetch the screen time limit")?;
            println!("Screen time limit: {limit}");
        }
        Some(LimitAction::Set { hours }) => {
            tracker
                .update_limit(hours)
                .await
                .context("Failed to update limit.")?;
            notify_success(format!("Screen time limit updated to {hours}!"));
        }
    }
    Ok(())
}
