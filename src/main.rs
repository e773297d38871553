use std::process::ExitCode;

use tracing::error;
use unplug::{
    cli::{output::notify_error, run_cli},
    utils::runtime::single_thread_runtime,
};

fn main() -> ExitCode {
    let result = single_thread_runtime().and_then(|runtime| runtime.block_on(run_cli()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error running cli {e:?}");
            // clap errors print their own usage text and exit code
            if let Some(clap_error) = e.downcast_ref::<clap::Error>() {
                clap_error.exit();
            }
            notify_error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
