use crate::streak::StreakPolicy;
use chrono::NaiveDate;
use std::env;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8081";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SYNC_FIT_TODAY must be YYYY-MM-DD, got '{0}'")]
    InvalidToday(String),
    #[error("SYNC_FIT_STREAK_POLICY must be 'rest-day-tolerant' or 'strict-daily', got '{0}'")]
    InvalidPolicy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub api_url: String,
    /// Pins the application clock; the system UTC date is used otherwise.
    pub today: Option<NaiveDate>,
    pub streak_policy: StreakPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_url = lookup("SYNC_FIT_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let today = match lookup("SYNC_FIT_TODAY").filter(|value| !value.trim().is_empty()) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidToday(raw))?,
            ),
            None => None,
        };

        let streak_policy = match lookup("SYNC_FIT_STREAK_POLICY").filter(|value| !value.trim().is_empty()) {
            Some(raw) => StreakPolicy::parse(&raw).ok_or(ConfigError::InvalidPolicy(raw))?,
            None => StreakPolicy::default(),
        };

        Ok(Self {
            port,
            api_url,
            today,
            streak_policy,
        })
    }
}
