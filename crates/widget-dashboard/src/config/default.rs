//! Default configuration template and file creation.
//!
//! The template documents every option and parses to exactly
//! `Config::default()`.

use std::fs;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::xdg;

/// Commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Widget Dashboard Configuration
#
# Generated by `wdash config init`. All values below are the built-in
# defaults; edit them to customize the dashboard client.
#
# Location: $XDG_CONFIG_HOME/widget-dashboard/config.toml

# ==============================================================================
# Backend API
# ==============================================================================

[api]

# Base URL of the dashboard backend. The client calls
# /api/dashboards, /api/get_cards/{id} and /api/update_card below it.
base_url = "https://v3-tjof.onrender.com"

# Per-request timeout. Requests are never retried.
# Examples: "10s", "30s", "1m"
timeout = "30s"

# ==============================================================================
# Session
# ==============================================================================

[session]

# Owner of the dashboards opened with `wdash open`.
# Required for the editable view; `--user` overrides it.
username = ""

# Origin that share links are built against:
# {share_origin}/shared-dashboard/{username}/{dashboard_id}
share_origin = "http://localhost:3000"

# ==============================================================================
# Terminal UI
# ==============================================================================

[tui]

# Event loop tick interval.
# Examples: "100ms", "250ms", "1s"
tick_rate = "250ms"

# Pixel size of one terminal cell. Widget positions and sizes are stored in
# pixels; the viewport width used for device classes is columns * cell_width.
cell_width = 10
cell_height = 20

# ==============================================================================
# Sharing
# ==============================================================================

[share]

# Native share command, run via `sh -c` with WDASH_SHARE_URL,
# WDASH_SHARE_TITLE and WDASH_SHARE_TEXT set in its environment.
# Empty: the link is copied to the clipboard instead.
# Example: 'xdg-open "$WDASH_SHARE_URL"'
command = ""

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Verbosity: "error", "warn", "info", "debug", "trace".
# The WDASH_LOG environment variable overrides this.
level = "info"

# Log file used while the terminal UI is running. Empty discards log output
# during the UI. Other commands always log to stderr.
# Tilde (~) is expanded to the home directory.
file = ""
"#;

/// Writes the default template to `path`.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, renames it to `.toml.backup` first.
pub fn create_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

/// Writes the template, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        xdg::ensure_dir(parent).map_err(write_error)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}
