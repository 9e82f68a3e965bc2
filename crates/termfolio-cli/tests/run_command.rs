use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

fn termfolio(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("termfolio");
    cmd.env("TERMFOLIO_HOME", home.path())
        .env_remove("TERMFOLIO_LOG");
    cmd
}

#[test]
fn test_run_projects_prints_every_project_link() {
    let home = tempdir().unwrap();

    termfolio(&home)
        .args(["run", "projects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MY PROJECTS"))
        .stdout(predicate::str::contains("https://github.com/jordanavery/termfolio"))
        .stdout(predicate::str::contains("https://github.com/jordanavery/lexi"));
}

#[test]
fn test_run_is_case_insensitive_and_passes_arguments() {
    let home = tempdir().unwrap();

    termfolio(&home)
        .args(["run", "HELP", "stack"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack - Technologies I work with"));
}

#[test]
fn test_run_unknown_command_fails_with_hint() {
    let home = tempdir().unwrap();

    termfolio(&home)
        .args(["run", "Frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("command not found: Frobnicate"))
        .stderr(predicate::str::contains("help"));
}

#[test]
fn test_run_clear_is_interactive_only() {
    let home = tempdir().unwrap();

    termfolio(&home)
        .args(["run", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive"));
}

#[test]
fn test_run_uses_content_file() {
    let home = tempdir().unwrap();
    let content = home.path().join("me.toml");
    fs::write(
        &content,
        r#"
[profile]
name = "Sam Rivera"
email = "sam@example.com"
bio = "Builds compilers for fun."
"#,
    )
    .unwrap();

    termfolio(&home)
        .arg("--content")
        .arg(&content)
        .args(["run", "about"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sam Rivera"))
        .stdout(predicate::str::contains("Builds compilers for fun."));

    termfolio(&home)
        .arg("--content")
        .arg(&content)
        .args(["run", "resume"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no resume link is configured"));
}

#[test]
fn test_run_reports_unreadable_content_file() {
    let home = tempdir().unwrap();

    termfolio(&home)
        .args(["--content", "/definitely/missing.toml", "run", "about"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_run_writes_log_file() {
    let home = tempdir().unwrap();

    termfolio(&home).args(["run", "about"]).assert().success();

    let logs = fs::read_dir(home.path().join("logs")).unwrap().count();
    assert!(logs > 0);
}

#[test]
fn test_interactive_mode_requires_a_terminal() {
    let home = tempdir().unwrap();

    termfolio(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}
