//! Logging configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_LOG_LEVEL: &str = "finance_client=info,warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Directory for the daily-rotated log files
    pub log_dir: PathBuf,
    /// File name prefix; the date is appended by the appender
    pub file_prefix: String,
    /// Filter directives (e.g., "finance_client=debug,info")
    pub log_level: String,
    /// Also write human-readable logs to stderr
    pub stderr: bool,
    /// Write JSON lines to the log file instead of plain text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            file_prefix: "finance-client.log".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            stderr: false,
            json: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_dir: lib_utils::get_env("FINANCE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: lib_utils::get_env_or("RUST_LOG", DEFAULT_LOG_LEVEL),
            stderr: flag("FINANCE_LOG_STDERR"),
            json: flag("FINANCE_LOG_JSON"),
            ..defaults
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

fn flag(name: &'static str) -> bool {
    lib_utils::get_env(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
