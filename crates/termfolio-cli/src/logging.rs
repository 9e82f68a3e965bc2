//! Log setup.
//!
//! Logs go to a daily file under `${TERMFOLIO_HOME}/logs` so they never draw
//! over the full-screen UI. `TERMFOLIO_LOG` takes precedence over the
//! configured `log_level`.

use std::fs;

use anyhow::{Context, Result, anyhow};
use termfolio_core::config::{Config, paths};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TERMFOLIO_LOG";

/// Installs the global subscriber.
///
/// Keep the returned guard alive until exit; dropping it flushes pending
/// log lines.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("termfolio")
        .filename_suffix("log")
        .build(&dir)
        .with_context(|| format!("open log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    Ok(guard)
}
