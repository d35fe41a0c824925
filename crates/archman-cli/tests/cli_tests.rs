//! Integration tests for archman-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use archman_core::test_utils::FS_CONFIG;
use archman_core::test_utils::S3_CONFIG;
use archman_core::test_utils::write_package_home;
use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn archive_manager_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("archive-manager");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn cmd_in_home(home: &Path) -> Command {
    let mut cmd = archive_manager_cmd();
    cmd.env("CLP_HOME", home);
    cmd
}

fn package_home(config_yaml: &str) -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");
    write_package_home(temp.path(), config_yaml);
    temp
}

#[test]
fn test_version_flag() {
    archive_manager_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("archive-manager"));
}

#[test]
fn test_help_flag() {
    archive_manager_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("View or delete archives"));
}

#[test]
fn test_find_help() {
    archive_manager_cmd()
        .args(["find", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--begin-ts"))
        .stdout(predicate::str::contains("--end-ts"));
}

#[test]
fn test_del_requires_target() {
    archive_manager_cmd()
        .arg("del")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_del_by_ids_requires_ids() {
    archive_manager_cmd()
        .args(["del", "by-ids"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("<ID>"));
}

#[test]
fn test_del_by_filter_requires_end_ts() {
    archive_manager_cmd()
        .args(["del", "by-filter", "--begin-ts", "0"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--end-ts"));
}

#[test]
fn test_find_inverted_range_exits_with_failure_status() {
    let home = package_home(FS_CONFIG);

    cmd_in_home(home.path())
        .args(["find", "--begin-ts", "100", "--end-ts", "50"])
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("begin-ts must be <= end-ts"));

    assert!(!home.path().join("var/log").exists());
}

#[test]
fn test_del_by_filter_negative_exits_with_failure_status() {
    let home = package_home(FS_CONFIG);

    cmd_in_home(home.path())
        .args(["del", "by-filter", "--begin-ts", "-1", "--end-ts", "10"])
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("must be non-negative"));
}

#[test]
fn test_unsupported_storage_exits_with_failure_status() {
    let home = package_home(S3_CONFIG);

    cmd_in_home(home.path())
        .args(["del", "by-ids", "a1"])
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("storage type: s3"));
}

#[test]
fn test_missing_custom_config_exits_with_failure_status() {
    let home = package_home(FS_CONFIG);

    cmd_in_home(home.path())
        .args(["--config"])
        .arg(home.path().join("missing.yml"))
        .arg("find")
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_json_failure_envelope() {
    let home = package_home(S3_CONFIG);

    let output = cmd_in_home(home.path())
        .args(["--json", "find"])
        .assert()
        .failure()
        .code(255)
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "error");
    assert_eq!(json["operation"], "find");
}

#[test]
fn test_completion_bash() {
    archive_manager_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive-manager"));
}

/// Uses `true` as the container engine so the full dispatch path runs
/// without a container runtime.
#[cfg(unix)]
#[test]
fn test_del_by_ids_dispatch_json() {
    let home = package_home(FS_CONFIG);

    let output = cmd_in_home(home.path())
        .env("ARCHMAN_CONTAINER_ENGINE", "true")
        .args(["--json", "del", "by-ids", "a1", "a2", "--dry-run"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "del");

    let command: Vec<&str> = json["data"]["command"]
        .as_array()
        .unwrap()
        .iter()
        .map(|arg| arg.as_str().unwrap())
        .collect();
    assert_eq!(command[0], "true");
    assert!(command.ends_with(&["del", "--dry-run", "by-ids", "a1", "a2"]));

    let removed = json["data"]["removed_config"].as_str().unwrap();
    assert!(!Path::new(removed).exists());
}

#[cfg(unix)]
#[test]
fn test_del_by_filter_dispatch_removes_generated_config() {
    let home = package_home(FS_CONFIG);

    cmd_in_home(home.path())
        .env("ARCHMAN_CONTAINER_ENGINE", "true")
        .args(["del", "by-filter", "--begin-ts", "0", "--end-ts", "1000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("finished"));

    let leftovers = std::fs::read_dir(home.path().join("var/log"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with("-config.yml"))
        .count();
    assert_eq!(leftovers, 0);
}

#[cfg(unix)]
#[test]
fn test_worker_failure_aborts() {
    let home = package_home(FS_CONFIG);

    cmd_in_home(home.path())
        .env("ARCHMAN_CONTAINER_ENGINE", "false")
        .arg("find")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("exited with status 1"));
}

#[test]
fn test_missing_engine_reports_hint() {
    let home = package_home(FS_CONFIG);

    cmd_in_home(home.path())
        .env("ARCHMAN_CONTAINER_ENGINE", "archman-no-such-engine")
        .arg("find")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ARCHMAN_CONTAINER_ENGINE"));
}
