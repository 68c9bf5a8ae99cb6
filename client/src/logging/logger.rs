//! File-based logging initialization

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::{LogConfig, DEFAULT_LOG_LEVEL};
use crate::core::error::{ClientError, Result};

/// Initialize the logging system
///
/// Sets up:
/// - Daily log rotation under `config.log_dir`
/// - Plain or JSON lines in the file, no ANSI codes
/// - An optional stderr layer for interactive use
/// - Non-blocking writes; keep the returned guard alive until exit so
///   buffered lines are flushed
/// - A panic hook that records panics in the log
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir).map_err(|e| {
        ClientError::Config(format!(
            "Failed to create log directory {}: {}",
            config.log_dir.display(),
            e
        ))
    })?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let (json_layer, text_layer) = if config.json {
        let layer = fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_current_span(true)
            .with_target(true);
        (Some(layer), None)
    } else {
        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);
        (None, Some(layer))
    };

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| ClientError::Config(format!("Failed to install log subscriber: {}", e)))?;

    tracing::info!(
        log_dir = %config.log_dir.display(),
        log_level = %config.log_level,
        json = config.json,
        stderr = config.stderr,
        "Logging initialized"
    );

    setup_panic_hook();
    Ok(guard)
}

/// Log panics with their location before the default hook runs
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        tracing::error!(location = %location, message = %message, "Application panic");
        default_panic(panic_info);
    }));
}
