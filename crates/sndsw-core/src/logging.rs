//! Logging configuration using tracing
//!
//! The terminal belongs to the menu while sndsw runs, so nothing is ever
//! written to stdout or stderr; logs go to a rolling file instead.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SNDSW_LOG";

const LOG_FILE: &str = "sndsw.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/sndsw/logs/`
/// Log level is controlled by the `SNDSW_LOG` environment variable.
///
/// # Examples
/// ```bash
/// SNDSW_LOG=debug sndsw
/// SNDSW_LOG=sndsw_app=trace sndsw
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);

    // Default to info for our crates, allow override via SNDSW_LOG
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new("sndsw=info,sndsw_app=info,sndsw_ctl=info,sndsw_tui=info,warn")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("sndsw {} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("sndsw").join("logs")
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> PathBuf {
    get_log_directory().join(LOG_FILE)
}
