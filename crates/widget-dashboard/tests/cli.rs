//! Integration tests for the `wdash` binary.
//!
//! Every test points `XDG_CONFIG_HOME` at its own temp dir so the user's real
//! configuration is never read or written.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const WDASH_BIN: &str = env!("CARGO_BIN_EXE_wdash");

fn wdash(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(WDASH_BIN);
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("WDASH_LOG");
    cmd
}

fn default_config_path(config_home: &TempDir) -> PathBuf {
    config_home
        .path()
        .join("widget-dashboard")
        .join("config.toml")
}

#[test]
fn test_share_url_with_user_flag() {
    let home = TempDir::new().expect("temp dir");
    wdash(&home)
        .args(["share-url", "dash-1", "--user", "user3"])
        .assert()
        .success()
        .stdout("http://localhost:3000/shared-dashboard/user3/dash-1\n");
}

#[test]
fn test_share_url_encodes_segments() {
    let home = TempDir::new().expect("temp dir");
    wdash(&home)
        .args(["share-url", "a/b", "--user", "jane doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/shared-dashboard/jane%20doe/a%2Fb"));
}

#[test]
fn test_share_url_without_username_fails() {
    let home = TempDir::new().expect("temp dir");
    wdash(&home)
        .args(["share-url", "dash-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No username"));
}

#[test]
fn test_share_url_uses_explicit_config() {
    let home = TempDir::new().expect("temp dir");
    let path = home.path().join("custom.toml");
    fs::write(
        &path,
        "[session]\nusername = \"user7\"\nshare_origin = \"https://dash.example.com\"\n",
    )
    .expect("write config");

    wdash(&home)
        .args(["--config", path.to_str().expect("utf8 path"), "share-url", "d9"])
        .assert()
        .success()
        .stdout("https://dash.example.com/shared-dashboard/user7/d9\n");
}

#[test]
fn test_missing_explicit_config_fails() {
    let home = TempDir::new().expect("temp dir");
    let path = home.path().join("absent.toml");
    wdash(&home)
        .args(["--config", path.to_str().expect("utf8 path"), "share-url", "d9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_path_follows_xdg() {
    let home = TempDir::new().expect("temp dir");
    let expected = default_config_path(&home);
    wdash(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(format!("{}\n", expected.display()));
}

#[test]
fn test_config_init_then_validate() {
    let home = TempDir::new().expect("temp dir");
    wdash(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));
    assert!(default_config_path(&home).exists());

    wdash(&home)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_init_refuses_overwrite_without_force() {
    let home = TempDir::new().expect("temp dir");
    wdash(&home).args(["config", "init"]).assert().success();

    wdash(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    wdash(&home)
        .args(["config", "init", "--force"])
        .assert()
        .success();
    let backup = default_config_path(&home).with_extension("toml.backup");
    assert!(backup.exists());
}

#[test]
fn test_config_validate_reports_parse_position() {
    let home = TempDir::new().expect("temp dir");
    let path = default_config_path(&home);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, "[api]\ntimeout = @bad\n").expect("write config");

    wdash(&home)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.toml:2:"));
}

#[test]
fn test_config_validate_rejects_bad_duration() {
    let home = TempDir::new().expect("temp dir");
    let path = default_config_path(&home);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, "[tui]\ntick_rate = \"soon\"\n").expect("write config");

    wdash(&home)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tui.tick_rate"));
}

#[test]
fn test_config_show_prints_defaults() {
    let home = TempDir::new().expect("temp dir");
    wdash(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[api]"))
        .stdout(predicate::str::contains("share_origin = \"http://localhost:3000\""));
}

#[test]
fn test_shared_rejects_foreign_link() {
    let home = TempDir::new().expect("temp dir");
    wdash(&home)
        .args(["shared", "--url", "http://localhost:3000/dashboard/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a shared dashboard link"));
}
