use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

const APPLICATION_DIR: &str = "unplug";

/// Directory holding `config.toml`. On Linux this is $XDG_CONFIG_HOME or $HOME/.config.
pub fn config_dir() -> Result<PathBuf> {
    let mut path = {
        cfg_if::cfg_if! {
            if #[cfg(windows)] {
                PathBuf::from(env::var("APPDATA").context("APPDATA should be present on Windows")?)
            } else {
                env::var("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
                    .context("Couldn't find neither XDG_CONFIG_HOME nor HOME")?
            }
        }
    };
    path.push(APPLICATION_DIR);
    Ok(path)
}

/// Directory used for logs. Created if missing. On Linux this is $XDG_STATE_HOME or
/// $HOME/.local/state.
pub fn create_state_dir() -> Result<PathBuf> {
    let mut path = {
        cfg_if::cfg_if! {
            if #[cfg(windows)] {
                PathBuf::from(env::var("APPDATA").context("APPDATA should be present on Windows")?)
            } else {
                env::var("XDG_STATE_HOME")
                    .map(PathBuf::from)
                    .or_else(|_| {
                        env::var("HOME").map(|home| PathBuf::from(home).join(".local/state"))
                    })
                    .context("Couldn't find neither XDG_STATE_HOME nor HOME")?
            }
        }
    };
    path.push(APPLICATION_DIR);

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
