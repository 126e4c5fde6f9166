//! Logging initialization for `wdash`.
//!
//! Configures the `tracing` subscriber with filter directives from the
//! `WDASH_LOG` environment variable, falling back to the configured level.
//!
//! ```bash
//! WDASH_LOG=debug wdash list
//! WDASH_LOG=widget_dashboard=trace,warn wdash open dash-1
//! ```
//!
//! The terminal UI owns stdout/stderr while it runs, so it logs to a file or
//! nowhere. Plain CLI commands log to stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "WDASH_LOG";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Standard error.
    Stderr,
    /// Appended to a file.
    File(PathBuf),
    /// Dropped.
    Discard,
}

impl LogDestination {
    /// Destination for a run: stderr for CLI commands; for the TUI the
    /// configured file, or nothing.
    pub fn for_run(tui: bool, file: Option<PathBuf>) -> Self {
        match (tui, file) {
            (false, _) => LogDestination::Stderr,
            (true, Some(path)) => LogDestination::File(path),
            (true, None) => LogDestination::Discard,
        }
    }
}

/// Filter from `WDASH_LOG`, or `level` when the variable is unset or invalid.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Installs the global subscriber.
///
/// Fails only if the log file cannot be opened. A second call is a no-op.
pub fn init(level: LogLevel, destination: &LogDestination) -> std::io::Result<()> {
    let builder = fmt().with_env_filter(env_filter(level)).with_target(false);

    let installed = match destination {
        LogDestination::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogDestination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogDestination::Discard => builder.with_writer(std::io::sink).try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
