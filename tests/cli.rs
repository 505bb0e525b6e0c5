//! Command-line tests for the state subcommands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn editor_shell(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("editor-shell").unwrap();
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_state_prints_both_keys() {
    let dir = TempDir::new().unwrap();
    editor_shell(&dir)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"vscode-tabs-store\": null"))
        .stdout(predicate::str::contains("\"ide-file-tree\": null"));
}

#[test]
fn test_reset_clears_state() {
    let dir = TempDir::new().unwrap();
    editor_shell(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shell state cleared"));
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("editor-shell")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("reset"));
}
