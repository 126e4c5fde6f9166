//! Config path resolution for widget-dashboard.
//!
//! - `$XDG_CONFIG_HOME/widget-dashboard` when the variable is set
//! - otherwise `~/.config/widget-dashboard` on Linux and the platform config
//!   directory (`~/Library/Application Support/widget-dashboard`) on macOS

use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "widget-dashboard";

/// Returns the configuration directory.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg).join(APP_NAME);
        }
    }
    platform_config_dir().join(APP_NAME)
}

/// Platform-native config base directory (without XDG override).
fn platform_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    let base = dirs::config_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::home_dir().map(|home| home.join(".config"));

    base.unwrap_or_else(|| PathBuf::from(".config"))
}

/// Returns `config_dir()/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}

/// Creates a directory and all parents with mode 0700.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Run a closure with env vars temporarily set, then restore them.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<_> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        f();

        for (k, original) in &originals {
            match original {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }
    }

    #[test]
    #[serial]
    fn config_dir_respects_xdg_config_home() {
        with_env(&[("XDG_CONFIG_HOME", Some("/custom/config"))], || {
            assert_eq!(config_dir(), PathBuf::from("/custom/config/widget-dashboard"));
            assert_eq!(
                config_path(),
                PathBuf::from("/custom/config/widget-dashboard/config.toml")
            );
        });
    }

    #[test]
    #[serial]
    fn empty_xdg_config_home_falls_back_to_platform() {
        with_env(&[("XDG_CONFIG_HOME", Some(""))], || {
            let dir = config_dir();
            assert!(dir.ends_with(APP_NAME));
            assert_ne!(dir, PathBuf::from(APP_NAME));
        });
    }

    #[test]
    #[serial]
    #[cfg(not(target_os = "macos"))]
    fn config_dir_defaults_to_dot_config() {
        with_env(
            &[("XDG_CONFIG_HOME", None), ("HOME", Some("/home/tester"))],
            || {
                assert_eq!(
                    config_dir(),
                    PathBuf::from("/home/tester/.config/widget-dashboard")
                );
            },
        );
    }

    #[test]
    #[serial]
    fn expand_tilde_uses_home() {
        with_env(&[("HOME", Some("/home/tester"))], || {
            assert_eq!(expand_tilde("~/logs/wdash.log"), PathBuf::from("/home/tester/logs/wdash.log"));
            assert_eq!(expand_tilde("~"), PathBuf::from("/home/tester"));
        });
    }

    #[test]
    fn expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde("/var/log/wdash.log"), PathBuf::from("/var/log/wdash.log"));
        assert_eq!(expand_tilde("logs/~x"), PathBuf::from("logs/~x"));
    }

    #[test]
    fn ensure_dir_creates_nested_private_dir() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).expect("ensure_dir should succeed");
        assert!(nested.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&nested).expect("metadata").permissions().mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }
}
