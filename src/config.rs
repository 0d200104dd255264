//! Runtime configuration from environment variables with defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const STATE_FILE_NAME: &str = "state.json";

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat server base URL.
    pub base_url: String,
    /// Interval between background refreshes in follow mode.
    pub poll_interval: Duration,
    /// Location of the persisted-selection state file.
    pub state_file: PathBuf,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("CHATFEED_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let poll_secs = env_parse("CHATFEED_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS);
        let state_file = std::env::var("CHATFEED_STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_state_file());
        Self {
            base_url,
            poll_interval: Duration::from_secs(poll_secs),
            state_file,
        }
    }
}

fn default_state_file() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".chatfeed").join(STATE_FILE_NAME),
        Err(_) => PathBuf::from(STATE_FILE_NAME),
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
