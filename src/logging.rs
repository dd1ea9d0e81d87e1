use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "typen.log";

/// Map `-v` repetitions to a default filter. `RUST_LOG` wins when set.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to a file in `log_dir`, since the terminal belongs to the UI.
///
/// The returned guard flushes the writer on drop and must be held until exit.
pub fn init(log_dir: &Path, verbosity: u8) -> Result<Option<WorkerGuard>> {
    fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // A subscriber is already installed; the guard is dropped so its writer shuts down.
        Err(_) => Ok(None),
    }
}
