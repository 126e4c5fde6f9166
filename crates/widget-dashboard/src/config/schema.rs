//! TOML configuration schema for the widget dashboard.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so any subset of the file is valid.
//!
//! Duration fields are human-readable strings (`"30s"`, `"250ms"`) parsed with
//! `humantime` by the accessor methods, which also validate URLs and scales.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::error::ConfigError;

/// Root configuration encompassing all sections.
///
/// ```toml
/// [api]
/// [session]
/// [tui]
/// [share]
/// [logging]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Backend connection.
    pub api: ApiConfig,
    /// Identity and share link origin.
    pub session: SessionConfig,
    /// Terminal UI behaviour and pixel scale.
    pub tui: TuiConfig,
    /// Native share facility.
    pub share: ShareConfig,
    /// Log verbosity and destination.
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks every field that is only parsed on use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.timeout()?;
        self.api.base_url()?;
        self.session.share_origin()?;
        self.tui.tick_rate()?;
        self.tui.cell_size()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

/// Backend connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are resolved against.
    pub base_url: String,
    /// Per-request timeout as a human-readable duration.
    pub timeout: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: dashboard_api::DEFAULT_BASE_URL.to_string(),
            timeout: "30s".to_string(),
        }
    }
}

impl ApiConfig {
    /// Parsed request timeout.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("api.timeout", &self.timeout)
    }

    /// Parsed base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_url("api.base_url", &self.base_url)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Who is viewing, and where share links point.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Owner of the dashboards opened with `wdash open`. Required there.
    pub username: String,
    /// Origin share links are built against.
    pub share_origin: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            share_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl SessionConfig {
    /// Parsed share origin.
    pub fn share_origin(&self) -> Result<Url, ConfigError> {
        parse_url("session.share_origin", &self.share_origin)
    }
}

// ---------------------------------------------------------------------------
// TUI
// ---------------------------------------------------------------------------

/// Terminal UI settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval of the event loop (e.g. `"250ms"`).
    pub tick_rate: String,
    /// Pixels per terminal column.
    pub cell_width: u16,
    /// Pixels per terminal row.
    pub cell_height: u16,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate: "250ms".to_string(),
            cell_width: 10,
            cell_height: 20,
        }
    }
}

impl TuiConfig {
    /// Parsed tick interval.
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        parse_duration("tui.tick_rate", &self.tick_rate)
    }

    /// `(cell_width, cell_height)`, both non-zero.
    pub fn cell_size(&self) -> Result<(u16, u16), ConfigError> {
        if self.cell_width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tui.cell_width",
                message: "must be at least 1".to_string(),
            });
        }
        if self.cell_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tui.cell_height",
                message: "must be at least 1".to_string(),
            });
        }
        Ok((self.cell_width, self.cell_height))
    }
}

// ---------------------------------------------------------------------------
// Share
// ---------------------------------------------------------------------------

/// Native share facility.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ShareConfig {
    /// Shell command run via `sh -c` with `WDASH_SHARE_URL`,
    /// `WDASH_SHARE_TITLE` and `WDASH_SHARE_TEXT` set. Empty means the
    /// link is copied to the clipboard instead.
    pub command: String,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging settings. `WDASH_LOG` overrides `level` when set.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default verbosity.
    pub level: LogLevel,
    /// Log file used while the TUI owns the terminal. Empty discards logs
    /// during the TUI.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: String::new(),
        }
    }
}

impl LoggingConfig {
    /// Log file path with a leading `~` expanded, if one is configured.
    pub fn file_path(&self) -> Option<PathBuf> {
        let file = self.file.trim();
        if file.is_empty() {
            None
        } else {
            Some(crate::config::xdg::expand_tilde(file))
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::InvalidValue {
        field,
        message: format!("'{value}': {e}"),
    })
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        message: format!("'{value}': {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidValue {
            field,
            message: format!("'{value}' is not a base URL"),
        });
    }
    Ok(url)
}
