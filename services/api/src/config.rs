//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use tracing::Level;

use crate::adapters::arxiv::DEFAULT_ARXIV_API_URL;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub arxiv_api_url: String,
    pub default_max_results: u32,
    pub session_ttl_days: i64,
    pub cookie_secure: bool,
    pub cors_origin: HeaderValue,
}

impl Default for Config {
    /// Local-development settings; also what the tests run with.
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: "sqlite://paper_shelf.db?mode=rwc".to_string(),
            log_level: Level::INFO,
            arxiv_api_url: DEFAULT_ARXIV_API_URL.to_string(),
            default_max_results: 10,
            session_ttl_days: 30,
            cookie_secure: false,
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Config::default();

        // --- Load Server and Database Settings ---
        let bind_address = parse_var("BIND_ADDRESS", defaults.bind_address)?;

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        if database_url.trim().is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Paper Source Settings ---
        let arxiv_api_url = std::env::var("ARXIV_API_URL").unwrap_or(defaults.arxiv_api_url);
        let default_max_results = parse_var("DEFAULT_MAX_RESULTS", defaults.default_max_results)?;

        // --- Load Session Settings ---
        let session_ttl_days =
            check_session_ttl(parse_var("SESSION_TTL_DAYS", defaults.session_ttl_days)?)?;
        let cookie_secure = parse_var("COOKIE_SECURE", defaults.cookie_secure)?;

        let cors_origin = match std::env::var("CORS_ORIGIN") {
            Ok(origin) => origin
                .parse::<HeaderValue>()
                .map_err(|e| ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string()))?,
            Err(_) => defaults.cors_origin,
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            arxiv_api_url,
            default_max_results,
            session_ttl_days,
            cookie_secure,
            cors_origin,
        })
    }
}

/// Ten years. Larger values overflow the timestamp arithmetic at login.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

fn check_session_ttl(days: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_SESSION_TTL_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::InvalidValue(
            "SESSION_TTL_DAYS".to_string(),
            format!("must be between 1 and {} days", MAX_SESSION_TTL_DAYS),
        ))
    }
}

/// Reads and parses `name`, falling back to `default` when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_and_reports_bad_values() {
        assert_eq!(
            parse_var("PAPER_SHELF_TEST_UNSET_VAR", 7u32).unwrap(),
            7
        );

        std::env::set_var("PAPER_SHELF_TEST_BAD_VAR", "seven");
        let err = parse_var::<u32>("PAPER_SHELF_TEST_BAD_VAR", 7).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "PAPER_SHELF_TEST_BAD_VAR"));

        std::env::set_var("PAPER_SHELF_TEST_BOOL_VAR", "true");
        assert!(parse_var("PAPER_SHELF_TEST_BOOL_VAR", false).unwrap());
    }

    #[test]
    fn session_ttl_must_be_positive_and_bounded() {
        assert_eq!(check_session_ttl(30).unwrap(), 30);
        assert_eq!(check_session_ttl(MAX_SESSION_TTL_DAYS).unwrap(), MAX_SESSION_TTL_DAYS);
        assert!(check_session_ttl(0).is_err());
        assert!(check_session_ttl(-1).is_err());
        assert!(check_session_ttl(MAX_SESSION_TTL_DAYS + 1).is_err());
        assert!(check_session_ttl(i64::MAX).is_err());
    }
}
