//! File logging.
//!
//! The TUI owns the terminal, so logs go to `<home>/logs/wordsd.log` only.
//! `WORDSD_LOG` (then `RUST_LOG`) takes an `EnvFilter` directive string.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wordsd_core::config::paths;

pub const LOG_ENV: &str = "WORDSD_LOG";
const LOG_FILE: &str = "wordsd.log";
const DEFAULT_FILTER: &str = "wordsd=info,wordsd_core=info,wordsd_tui=info,warn";

/// Installs the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init() -> Result<WorkerGuard> {
    let log_dir = paths::logs_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .context("install tracing subscriber")?;

    tracing::info!("logging to {}", log_dir.join(LOG_FILE).display());
    Ok(guard)
}
