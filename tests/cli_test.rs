//! Binary-level CLI tests. These never reach a real helper process: they
//! exercise argument parsing and the spawn-failure path only.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("cliphist-bridge").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("pick"))
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("--pwsh"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("cliphist-bridge").unwrap();
    cmd.arg("--version").assert().success().stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_no_subcommand_prints_hint() {
    let mut cmd = Command::cargo_bin("cliphist-bridge").unwrap();
    cmd.assert().success().stdout(predicate::str::contains("--help"));
}

#[test]
fn test_missing_helper_fails_with_spawn_error() {
    let mut cmd = Command::cargo_bin("cliphist-bridge").unwrap();
    cmd.args(["--pwsh", "/nonexistent/powershell", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to spawn"));
}

#[test]
fn test_rejects_unknown_flag() {
    let mut cmd = Command::cargo_bin("cliphist-bridge").unwrap();
    cmd.arg("--definitely-not-a-flag").assert().failure();
}
