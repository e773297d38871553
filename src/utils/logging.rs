use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Where and how much to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Rolling log files only, at `RUST_LOG` or info.
    Files,
    /// Rolling log files and the console, at trace. This is what `--log` asks for.
    FilesAndConsole,
}

impl LogTarget {
    pub fn from_flag(log: bool) -> Self {
        if log {
            Self::FilesAndConsole
        } else {
            Self::Files
        }
    }

    fn shows_console(self) -> bool {
        self == Self::FilesAndConsole
    }

    /// Filter directive scoped to this crate. `rust_log` is only consulted for file-only logging.
    fn directive(self, rust_log: Option<&str>) -> String {
        let level = match (self, rust_log.map(str::trim)) {
            (Self::FilesAndConsole, _) => LevelFilter::TRACE.to_string(),
            (Self::Files, Some(level)) if level.parse::<LevelFilter>().is_ok() => level.to_string(),
            (Self::Files, _) => DEFAULT_LEVEL.to_string(),
        };
        format!(
            "{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level.to_lowercase()
        )
    }
}

/// Installs the global subscriber. Logs always go to a daily rolling file (5 kept) under
/// `state_dir/logs`.
pub fn enable_logging(prefix: &str, state_dir: &Path, target: LogTarget) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(prefix)
        .build(state_dir.join("logs"))?;

    let show_console = target.shows_console();
    let stdout = std::io::stdout.with_filter(move |_| show_console);
    let rust_log = std::env::var("RUST_LOG").ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(target.directive(rust_log.as_deref())))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .with_ansi(show_console)
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
