// Configuration loaded from an optional YAML file

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const APP_DIR: &str = "breakmywallet";
const CONFIG_FILE: &str = "config.yaml";
const DB_FILE: &str = "bmw_maint.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite database file
    pub database: PathBuf,
    /// How long opening or writing waits on a locked database file
    pub busy_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database: data_dir.join(APP_DIR).join(DB_FILE),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Default config file location, `<config_dir>/breakmywallet/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(file = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let config = Self::parse(&content).map_err(|reason| Error::Config {
            path: path.to_path_buf(),
            reason,
        })?;

        debug!(file = ?path, database = ?config.database, "Loaded config");
        Ok(config)
    }

    /// Load from the default location, or the defaults if there is none
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        // An empty file parses as YAML null rather than an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.database.as_os_str().is_empty() {
            return Err("database path cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
