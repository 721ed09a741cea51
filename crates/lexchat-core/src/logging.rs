//! Tracing setup.
//!
//! Logs go to a file under ${LEXCHAT_HOME}/logs so interactive output on
//! stdout stays clean. `LEXCHAT_LOG` overrides the configured filter.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, paths};

const LOG_ENV: &str = "LEXCHAT_LOG";

/// Builds the filter from `LEXCHAT_LOG`, falling back to the configured level.
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Returns the appender guard; dropping it flushes pending log lines.
/// Returns `None` when file logging is disabled.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let file = config.file.trim();
    if file.is_empty() {
        return Ok(None);
    }

    let dir = paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // A subscriber may already be installed (tests, embedding apps).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(Some(guard))
}
