use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("wordsd")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_run_help_shows_options() {
    cargo_bin_cmd!("wordsd")
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--choice"))
        .stdout(predicate::str::contains("--normal-speed"))
        .stdout(predicate::str::contains("--transcript"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("wordsd")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
