//! services/client/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;

use dispute_assistant_core::{FollowUpPolicy, DEFAULT_GREETING};
use tracing::Level;

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
    /// Where the backend lives. Required: there is no fallback that would
    /// silently target somebody's development machine.
    pub backend_base_url: String,
    pub request_timeout: Duration,
    pub log_level: Level,
    pub follow_up_policy: FollowUpPolicy,
    /// Directory decoded report documents are written into.
    pub download_dir: PathBuf,
    pub greeting_text: String,
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

        let backend_base_url = std::env::var("BACKEND_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("BACKEND_BASE_URL".to_string()))?;

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            Err(_) => 30,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let follow_up_policy = match std::env::var("FOLLOW_UP_POLICY") {
            Ok(raw) => match raw.to_lowercase().as_str() {
                "always" => FollowUpPolicy::Always,
                "after-confirm-success" => FollowUpPolicy::AfterConfirmSuccess,
                other => {
                    return Err(ConfigError::InvalidValue(
                        "FOLLOW_UP_POLICY".to_string(),
                        format!("'{}' is not a known policy", other),
                    ))
                }
            },
            Err(_) => FollowUpPolicy::default(),
        };

        let download_dir = std::env::var("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./reports"));

        let greeting_text =
            std::env::var("GREETING_TEXT").unwrap_or_else(|_| DEFAULT_GREETING.to_string());

        Ok(Self {
            backend_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
            follow_up_policy,
            download_dir,
            greeting_text,
        })
    }
}
