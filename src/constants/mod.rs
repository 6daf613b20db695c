//! # Constants and Environment Module
//!
//! This module defines the static API constants and resolves the base URL of the
//! departure board service. The base URL can be overridden from the environment
//! (or a `.env` file) through `DBF_BASE_URL`, which is handy for pointing the
//! board at a self-hosted instance.
//!
//! The override is loaded lazily and cached on first use to avoid repeated
//! environment lookups.

use once_cell::sync::OnceCell;
use std::env;
use std::fmt;

/// Default base URL of the DBF departure board service.
pub const DEFAULT_BASE_URL: &str = "https://dbf.finalrewind.org/";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_VAR: &str = "DBF_BASE_URL";

/// Query suffix that switches the board page to its JSON API.
pub const API_SUFFIX: &str = "&mode=json&version=3";

/// Represents errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The environment variable is set but contains an empty or whitespace-only value.
    EmptyVar(&'static str),
    /// The configuration file could not be read.
    Read {
        path: String,
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for a board configuration.
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    /// Formats the configuration error for display.
    ///
    /// ```ignore
    /// let empty_error = ConfigError::EmptyVar("DBF_BASE_URL");
    /// assert_eq!(
    ///     empty_error.to_string(),
    ///     "Environment variable 'DBF_BASE_URL' is set but empty. \
    ///      Unset it to use the public instance."
    /// );
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyVar(var) => write!(
                f,
                "Environment variable '{var}' is set but empty. \
                Unset it to use the public instance."
            ),
            ConfigError::Read { path, source } => {
                write!(f, "Could not read config file '{path}': {source}")
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Config file '{path}' is not valid: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::EmptyVar(_) => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// A thread-safe, write-once cell caching the resolved base URL.
static BASE_URL_CELL: OnceCell<String> = OnceCell::new();

/// Lazily resolves and caches an optional override, falling back to `default`.
///
/// On the first call the `fetch` closure runs. An unset variable resolves to
/// `default`; a set but blank one is rejected. Subsequent calls return the
/// cached value directly.
///
/// # Arguments
///
/// * `var` - The name of the variable being loaded (for error reporting).
/// * `default` - Value used when the variable is not set.
/// * `cell` - The `OnceCell` used for caching.
/// * `fetch` - A closure that attempts to load the value.
fn load_with<F>(
    var: &'static str,
    default: &'static str,
    cell: &'static OnceCell<String>,
    fetch: F,
) -> Result<&'static str, ConfigError>
where
    F: for<'a> Fn(&'a str) -> Result<String, env::VarError>,
{
    let value_ref = cell.get_or_try_init(|| resolve(var, default, fetch(var)))?;
    Ok(value_ref.as_str())
}

fn resolve(
    var: &'static str,
    default: &'static str,
    fetched: Result<String, env::VarError>,
) -> Result<String, ConfigError> {
    match fetched {
        Ok(val) if val.trim().is_empty() => Err(ConfigError::EmptyVar(var)),
        Ok(val) => Ok(val.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

/// Retrieves the base URL of the board service.
///
/// `DBF_BASE_URL` is consulted on the first call and the result is cached.
///
/// # Errors
///
/// Returns `ConfigError::EmptyVar` if the override is set but blank.
pub fn base_url() -> Result<&'static str, ConfigError> {
    load_with(BASE_URL_VAR, DEFAULT_BASE_URL, &BASE_URL_CELL, |s| env::var(s))
}
