use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;

fn cmd() -> Command {
    Command::cargo_bin("quill-cli").unwrap()
}

#[test]
#[serial]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("categories"));
}

#[test]
#[serial]
fn status_without_token_points_at_login() {
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token");

    cmd()
        .arg("--token-file")
        .arg(&token_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No token found"));
}

#[test]
#[serial]
fn status_reports_a_saved_token() {
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "abcdefghijklmnopqrstuvwxyz0123456789").unwrap();

    cmd()
        .arg("--token-file")
        .arg(&token_file)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("abcdefghijklmnopqrst..."))
        .stdout(predicate::str::contains("36 characters"));
}

#[test]
#[serial]
fn logout_removes_the_token_file() {
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token");
    std::fs::write(&token_file, "some-token").unwrap();

    cmd()
        .arg("--token-file")
        .arg(&token_file)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    assert!(!token_file.exists());
}
