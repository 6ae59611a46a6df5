//! Tracing subscriber setup.
//!
//! Text commands log to stderr. The dashboard owns the terminal, so it logs to
//! a file through a non-blocking appender instead; the returned guard must be
//! held until the session ends so buffered lines are flushed.

use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Config;
use crate::error::AppError;

/// Where log lines should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Install the global subscriber.
pub fn init(config: &Config, target: LogTarget) -> Result<Option<WorkerGuard>, AppError> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| AppError::source(format!("Invalid log filter '{}': {e}", config.log_filter)))?;

    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(filter);
            tracing_subscriber::registry()
                .with(layer)
                .try_init()
                .map_err(|e| AppError::runtime(format!("Failed to install logger: {e}")))?;
            Ok(None)
        }
        LogTarget::File => {
            let appender = file_appender(&config.log_file)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(filter);
            tracing_subscriber::registry()
                .with(layer)
                .try_init()
                .map_err(|e| AppError::runtime(format!("Failed to install logger: {e}")))?;
            Ok(Some(guard))
        }
    }
}

/// Open (creating parent directories as needed) the dashboard's log file.
fn file_appender(path: &Path) -> Result<RollingFileAppender, AppError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .unwrap_or(OsStr::new("autosales.log"))
        .to_string_lossy()
        .into_owned();

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| AppError::source(format!("Cannot open log file '{}': {e}", path.display())))
}
