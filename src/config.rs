//! Process configuration.
//!
//! All tunables are collected into a single [`Settings`] struct built once at
//! startup and passed by reference into adapters, generators, and the
//! pipeline. There is no global settings singleton; code that needs a value
//! receives it explicitly.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default total timeout for one adapter HTTP request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default maximum attempts per adapter call (including the first).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default fixed delay between retry attempts, in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Default number of persistence workers draining the queue.
pub const DEFAULT_NUM_WORKERS: usize = 4;

/// Default sleep between ingestion cycles, in minutes.
pub const DEFAULT_CYCLE_WAIT_MINUTES: u64 = 60;

/// Default bounded work queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 200;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but could not be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// The environment variable name.
        name: &'static str,
        /// The offending raw value.
        value: String,
    },
}

/// Runtime settings for the ingestion process.
///
/// Provider API keys are optional: an absent key turns the corresponding
/// adapter into a logged no-op rather than an error.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Google Books API key (`GOOGLE_BOOKS_API_KEY`).
    pub google_books_api_key: Option<String>,
    /// YouTube Data API key (`YOUTUBE_API_KEY`).
    pub youtube_api_key: Option<String>,
    /// WorldCat Search API key (`WORLDCAT_KEY`).
    pub worldcat_key: Option<String>,
    /// Library of Congress API key (`LOC_API_KEY`).
    pub loc_api_key: Option<String>,
    /// Total timeout for one adapter request, seconds (`REQUEST_TIMEOUT`).
    pub request_timeout_secs: u64,
    /// Maximum attempts per adapter call (`MAX_RETRIES`).
    pub max_retries: u32,
    /// Fixed delay between attempts, seconds (`RETRY_DELAY`).
    pub retry_delay_secs: u64,
    /// Persistence worker pool size (`NUM_WORKERS`).
    pub num_workers: usize,
    /// Sleep between ingestion cycles, minutes (`CYCLE_WAIT_MINUTES`).
    pub cycle_wait_minutes: u64,
    /// Bounded work queue capacity (`QUEUE_CAPACITY`).
    pub queue_capacity: usize,
    /// SQLite database path (`DATABASE_PATH`).
    pub database_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            google_books_api_key: None,
            youtube_api_key: None,
            worldcat_key: None,
            loc_api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            num_workers: DEFAULT_NUM_WORKERS,
            cycle_wait_minutes: DEFAULT_CYCLE_WAIT_MINUTES,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            database_path: PathBuf::from("maktaba.db"),
        }
    }
}

impl Settings {
    /// Builds settings from the process environment.
    ///
    /// Absent variables fall back to defaults; empty API key values are
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable is present
    /// but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            google_books_api_key: optional_var("GOOGLE_BOOKS_API_KEY"),
            youtube_api_key: optional_var("YOUTUBE_API_KEY"),
            worldcat_key: optional_var("WORLDCAT_KEY"),
            loc_api_key: optional_var("LOC_API_KEY"),
            request_timeout_secs: parsed_var("REQUEST_TIMEOUT", defaults.request_timeout_secs)?,
            max_retries: parsed_var("MAX_RETRIES", defaults.max_retries)?,
            retry_delay_secs: parsed_var("RETRY_DELAY", defaults.retry_delay_secs)?,
            num_workers: parsed_var("NUM_WORKERS", defaults.num_workers)?,
            cycle_wait_minutes: parsed_var("CYCLE_WAIT_MINUTES", defaults.cycle_wait_minutes)?,
            queue_capacity: parsed_var("QUEUE_CAPACITY", defaults.queue_capacity)?,
            database_path: optional_var("DATABASE_PATH")
                .map_or(defaults.database_path, PathBuf::from),
        })
    }

    /// Total request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Inter-attempt retry delay as a [`Duration`].
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Sleep between ingestion cycles as a [`Duration`].
    #[must_use]
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_wait_minutes * 60)
    }
}

/// Reads an environment variable, treating absent and empty as `None`.
fn optional_var(name: &'static str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// Reads and parses an environment variable, falling back to `default`
/// when absent.
fn parsed_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_value(name, &value),
        Err(_) => Ok(default),
    }
}

/// Parses a raw variable value, reporting the offending input on failure.
fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}
