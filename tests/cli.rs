use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("fertility-dashboard").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fertility-dashboard"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn cli_rejects_unknown_flags() {
    let mut cmd = Command::cargo_bin("fertility-dashboard").unwrap();
    cmd.arg("--countries").arg("DEU");
    cmd.assert().failure();
}
