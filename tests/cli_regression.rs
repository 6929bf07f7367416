// CLI behaviour: rendering, validation exit codes and miette diagnostics.

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const FIXTURE: &str = "tests/fixtures/signup.yaml";

fn forma() -> Command {
    Command::cargo_bin("forma").unwrap()
}

#[test]
fn render_prints_markup() {
    forma()
        .args(["render", FIXTURE, "--action", "/signup"])
        .assert()
        .success()
        .stdout(
            contains("<form action=\"/signup\" method=\"post\"")
                .and(contains("<legend>Account</legend>"))
                .and(contains("<option value=\"g\" selected=\"selected\">Green</option>"))
                .and(contains("<option value=\"r\">Red</option>")),
        );
}

#[test]
fn render_binds_values() {
    forma()
        .args(["render", FIXTURE, "--values", r#"{"username": "ada", "color": "r"}"#])
        .assert()
        .success()
        .stdout(
            contains("value=\"ada\"")
                .and(contains("<option value=\"r\" selected=\"selected\">Red</option>")),
        );
}

#[test]
fn validate_reports_errors_and_fails() {
    forma()
        .args(["validate", FIXTURE, "--values", r#"{"username": "al", "email": "nope"}"#])
        .assert()
        .failure()
        .stdout(contains("username:").and(contains("at least 3 characters")).and(contains("email:")));
}

#[test]
fn validate_accepts_good_values() {
    forma()
        .args(["validate", FIXTURE, "--values", r#"{"username": "alice", "email": "a@b.io"}"#])
        .assert()
        .success()
        .stdout(contains("valid"));
}

#[test]
fn unknown_type_is_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"age": {"type": "slider"}}"#).unwrap();

    forma()
        .arg("render")
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("forma::config::unknown_type").or(contains("help:")));
}

#[test]
fn check_walks_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.json"), r#"{"q": {"type": "search"}}"#).unwrap();
    fs::write(dir.path().join("bad.yml"), "q:\n  type: slider\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    forma()
        .arg("check")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(contains("2 checked, 1 failed"));
}

#[test]
fn types_lists_catalog() {
    forma()
        .arg("types")
        .assert()
        .success()
        .stdout(contains("datetime-local").and(contains("checkbox-set")));
}
