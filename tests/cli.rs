//! Command line behaviour that does not need a toolchain.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_tool() {
    Command::cargo_bin("build_pkg")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--root"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn missing_manifest_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("build_pkg")
        .unwrap()
        .arg("--root")
        .arg(dir.path())
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn invalid_manifest_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("build_pkg.toml"), "[package]\nbinary = 1\n").unwrap();

    Command::cargo_bin("build_pkg")
        .unwrap()
        .arg("--root")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TOML error"));
}

#[test]
fn nonexistent_root_exits_with_one() {
    Command::cargo_bin("build_pkg")
        .unwrap()
        .args(["--root", "/definitely/not/a/brickd/checkout"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid arguments"));
}
