use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    screen_time::limit::{Limit, DEFAULT_LIMIT_HOURS},
    utils::dir::config_dir,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the detox API, e.g. "http://localhost:8080"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Shown when the server has no limit stored. Hours.
    #[serde(default = "default_limit")]
    pub default_limit: f64,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_limit() -> f64 {
    DEFAULT_LIMIT_HOURS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_limit: default_limit(),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Loads config from `path`. Returns default config if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn default_limit(&self) -> Result<Limit> {
        Limit::new(self.default_limit).context("Invalid default_limit in config")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use tempfile::{tempdir, NamedTempFile};

    use super::Config;

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::load(&dir.path().join("config.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "api_url = \"https://detox.example.com\"")?;
        writeln!(file, "default_limit = 4.5")?;

        let config = Config::load(file.path())?;

        assert_eq!(config.api_url, "https://detox.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(*config.default_limit()?, 4.5);
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "api_url = ")?;
        assert!(Config::load(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn negative_default_limit_is_rejected() {
        let config = Config {
            default_limit: -1.,
            ..Config::default()
        };
        assert!(config.default_limit().is_err());
    }
}
