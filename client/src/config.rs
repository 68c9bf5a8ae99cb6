//! # Client Configuration
//!
//! Loaded from environment variables (after `.env`, via `dotenvy`) and
//! validated on startup to fail fast if misconfigured.
//!
//! | Variable                   | Default                                   |
//! |----------------------------|-------------------------------------------|
//! | `FINANCE_API_URL`          | `http://localhost:8080/api`               |
//! | `FINANCE_API_TIMEOUT_SECS` | `30`                                      |
//! | `FINANCE_PREFS_PATH`       | `$HOME/.config/finance/preferences.json`  |

use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend API base, including the `/api` prefix
    pub api_url: String,

    /// Per-request timeout
    ///
    /// Valid range: 1-300 seconds
    pub timeout: Duration,

    /// Where theme and language preferences are stored
    pub prefs_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            prefs_path: default_prefs_path(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment and a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }

        let timeout_secs = match lib_utils::get_env_parse::<u64>("FINANCE_API_TIMEOUT_SECS") {
            Ok(secs) => secs,
            Err(lib_utils::envs::Error::MissingEnv(_)) => DEFAULT_TIMEOUT_SECS,
            Err(e) => {
                return Err(ClientError::Config(format!(
                    "FINANCE_API_TIMEOUT_SECS must be a whole number of seconds ({})",
                    e
                )))
            }
        };

        let config = Self {
            api_url: lib_utils::get_env_or("FINANCE_API_URL", DEFAULT_API_URL),
            timeout: Duration::from_secs(timeout_secs),
            prefs_path: lib_utils::get_env("FINANCE_PREFS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_prefs_path()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "FINANCE_API_URL must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }

        let secs = self.timeout.as_secs();
        if !(1..=300).contains(&secs) {
            return Err(ClientError::Config(
                "FINANCE_API_TIMEOUT_SECS must be between 1 and 300".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_prefs_path() -> PathBuf {
    match lib_utils::get_env("HOME") {
        Ok(home) => PathBuf::from(home).join(".config/finance/preferences.json"),
        Err(_) => PathBuf::from("preferences.json"),
    }
}
