//! # Utilities Library
//!
//! Shared helpers for environment variables, time and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse};
pub use time::{format_time, now_millis, now_utc, parse_utc};
pub use validation::{validate_email, validate_min_length, validate_not_empty};
