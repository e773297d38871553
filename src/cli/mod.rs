pub mod limit;
pub mod output;
pub mod stats;
pub mod todo;
pub mod track;

use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use limit::{process_limit_command, LimitCommand};
use stats::{process_stats_command, StatsCommand};
use todo::{process_todo_command, TodoCommand};
use tracing::info;
use track::{process_track_command, TrackCommand};

use crate::{
    api::http::HttpApi,
    config::Config,
    state::tracker::ScreenTimeTracker,
    todo::board::TaskBoard,
    utils::{
        clock::DefaultClock,
        dir::create_state_dir,
        logging::{enable_logging, LogTarget, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "unplug", version, long_about = None)]
#[command(about = "Track screen time and todos against a digital detox server", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging to the console")]
    log: bool,
    #[arg(
        long,
        help = "Config file. By default $XDG_CONFIG_HOME/unplug/config.toml or $HOME/.config/unplug/config.toml"
    )]
    config: Option<PathBuf>,
    #[arg(long, help = "Base URL of the API. Overrides the config file")]
    api_url: Option<String>,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show screen time per day with daily, weekly and monthly statistics")]
    Stats {
        #[command(flatten)]
        command: StatsCommand,
    },
    #[command(about = "Show or change the daily screen time limit")]
    Limit {
        #[command(flatten)]
        command: LimitCommand,
    },
    #[command(about = "Record screen time for a day")]
    Track {
        #[command(flatten)]
        command: TrackCommand,
    },
    #[command(about = "Manage the todo list")]
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    enable_logging(
        CLI_PREFIX,
        &create_state_dir()?,
        LogTarget::from_flag(args.log),
    )?;

    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    info!("Using API at {}", config.api_url);

    let api = HttpApi::new(&config.api_url, config.request_timeout())?;

    match args.commands {
        Commands::Stats { command } => {
            let mut tracker =
                ScreenTimeTracker::new(api, Box::new(DefaultClock), config.default_limit()?);
            process_stats_command(command, args.date_style, &mut tracker).await
        }
        Commands::Limit { command } => {
            let mut tracker =
                ScreenTimeTracker::new(api, Box::new(DefaultClock), config.default_limit()?);
            process_limit_command(command, &mut tracker).await
        }
        Commands::Track { command } => {
            let mut tracker =
                ScreenTimeTracker::new(api, Box::new(DefaultClock), config.default_limit()?);
            process_track_command(command, args.date_style, &mut tracker).await
        }
        Commands::Todo { command } => {
            let mut board = TaskBoard::new(api, Box::new(DefaultClock));
            process_todo_command(command, args.date_style, &mut board).await
        }
    }
}

/// Parses a user supplied date such as "yesterday", "15/03/2025" or "next friday". Relative dates
/// are resolved against `now`, which comes from the same clock that validates the date later.
pub fn parse_date_arg(
    value: &str,
    date_style: DateStyle,
    now: NaiveDateTime,
    argument: &str,
) -> Result<NaiveDate> {
    match parse_date_string(value, now.and_utc(), date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate {argument} {value:?}: {e}"),
            )
            .into()),
    }
}

/// Turns a validation failure into a clap error so it is reported like other bad arguments.
pub fn validation_error(message: impl Display) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message.to_string())
        .into()
}
