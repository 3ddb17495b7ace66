//! Configuration module for the FitTrack core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file backing the key-value store
    pub db_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
    /// Simulated latency applied to login and signup
    pub auth_delay: Duration,
    /// Seed fixture data when a collection has never been stored
    pub seed_fixtures: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("FITTRACK_DB_PATH")
            .unwrap_or_else(|_| "./data/fittrack.sqlite".to_string())
            .into();

        let log_level = env::var("FITTRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = match env::var("FITTRACK_LOG_FORMAT") {
            Ok(raw) => parse_log_format(&raw).ok_or_else(|| {
                AppError::Config(format!("Invalid FITTRACK_LOG_FORMAT value: {}", raw))
            })?,
            Err(_) => false,
        };

        let auth_delay = match env::var("FITTRACK_AUTH_DELAY_MS") {
            Ok(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| {
                AppError::Config(format!("Invalid FITTRACK_AUTH_DELAY_MS value: {}", raw))
            })?,
            Err(_) => Duration::from_millis(800),
        };

        let seed_fixtures = match env::var("FITTRACK_SEED_FIXTURES") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("Invalid FITTRACK_SEED_FIXTURES value: {}", raw))
            })?,
            Err(_) => true,
        };

        Ok(Self {
            db_path,
            log_level,
            log_json,
            auth_delay,
            seed_fixtures,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `Some(true)` for `json`, `Some(false)` for `text`.
fn parse_log_format(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Some(true),
        "text" => Some(false),
        _ => None,
    }
}
