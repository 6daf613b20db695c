//! Board configuration.
//!
//! A `Config` is fixed for the lifetime of a session. It can be loaded from a
//! JSON file using the same option names as the departure board module it
//! mirrors (`updateInterval`, `numberOfResults`, ...); every option is optional
//! and falls back to its default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Poll cadence in milliseconds once data has loaded.
    pub update_interval: u64,
    /// Poll cadence in milliseconds while waiting for the first successful load.
    pub retry_delay: u64,
    pub station: String,
    /// Platform filter, passed to the API verbatim.
    pub platform: String,
    /// Comma-separated via-station tokens. Empty disables via filtering.
    pub via: String,
    /// Hand the board URL to an embedded frame instead of rendering rows.
    pub show_app: bool,
    pub show_arrival_time: bool,
    pub show_real_time: bool,
    /// Show scheduled arrival instead of scheduled departure.
    pub only_arrival_time: bool,
    pub number_of_results: usize,
    /// Destinations that never make it onto the board (exact match).
    pub without_destination: Vec<String>,
    /// Frame sizing, only used in app-frame mode.
    pub height: String,
    pub width: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_interval: 60_000,
            retry_delay: 30_000,
            station: "Düsseldorf Hbf".to_string(),
            platform: String::new(),
            via: String::new(),
            show_app: false,
            show_arrival_time: false,
            show_real_time: false,
            only_arrival_time: false,
            number_of_results: 10,
            without_destination: Vec::new(),
            height: "600px".to_string(),
            width: "400px".to_string(),
        }
    }
}

impl Config {
    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read and
    /// `ConfigError::Parse` if it is not a valid configuration object.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }

    /// Returns the configured via tokens.
    ///
    /// Tokens are the non-empty comma-separated pieces of `via`, taken as
    /// written. An empty piece would match every station.
    pub fn via_tokens(&self) -> Vec<&str> {
        self.via.split(',').filter(|token| !token.is_empty()).collect()
    }

    pub fn has_via(&self) -> bool {
        !self.via.is_empty()
    }

    pub fn is_excluded(&self, destination: &str) -> bool {
        self.without_destination.iter().any(|d| d == destination)
    }
}
