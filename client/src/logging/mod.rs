//! # Logging
//!
//! `tracing` subscriber setup for the CLI: daily-rotated log files via
//! `tracing-appender`, an `EnvFilter` from `RUST_LOG`, and an optional
//! stderr layer.
//!
//! | Variable             | Default                    |
//! |----------------------|----------------------------|
//! | `RUST_LOG`           | `finance_client=info,warn` |
//! | `FINANCE_LOG_DIR`    | `logs`                     |
//! | `FINANCE_LOG_STDERR` | off                        |
//! | `FINANCE_LOG_JSON`   | off                        |

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init;
