// integration tests for shell completions, version output and man page generation

use crate::common::*;
use std::fs;
use std::process::Command;

#[test]
fn test_completions_bash() {
    let output = run_rulecheck(&["completions", "bash"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("rulecheck"));
}

#[test]
fn test_completions_zsh_lists_commands() {
    let output = run_rulecheck(&["completions", "zsh"]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("#compdef rulecheck"));
    assert!(stdout.contains("eval"));
    assert!(stdout.contains("run"));
}

#[test]
fn test_completions_unknown_shell() {
    let output = run_rulecheck(&["completions", "cmd"]);
    assert!(!output.status.success());
}

#[test]
fn test_version_flag() {
    let output = run_rulecheck(&["--version"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).starts_with("rulecheck "));
}

#[test]
fn test_generate_man_page() {
    let dir = create_test_dir();

    let output = Command::new(env!("CARGO_BIN_EXE_generate-man"))
        .current_dir(dir.path())
        .output()
        .expect("Failed to run generate-man");
    assert!(output.status.success());

    let content = fs::read_to_string(dir.path().join("man").join("rulecheck.1"))
        .expect("man page should be written");
    assert!(content.contains(".TH"));
    assert!(content.contains("rulecheck"));
}
