// shared utilities for integration tests

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// path to the built rulecheck binary
pub fn rulecheck_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rulecheck"))
}

/// create a scratch directory, removed when dropped
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create test directory")
}

/// write a JSON document into the test directory
pub fn write_json(dir: &Path, name: &str, content: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(content).unwrap())
        .expect("Failed to write test file");
    path
}

/// write raw text into the test directory
pub fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn base_command(args: &[&str]) -> Command {
    let mut cmd = Command::new(rulecheck_binary_path());
    cmd.args(args);
    // keep the host environment from leaking into tests
    cmd.env_remove("RULECHECK_RULES");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// run rulecheck and capture output
pub fn run_rulecheck(args: &[&str]) -> Output {
    base_command(args).output().expect("Failed to run rulecheck")
}

/// run rulecheck with custom environment
pub fn run_rulecheck_with_env(args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = base_command(args);
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to run rulecheck")
}

/// run rulecheck feeding `input` on stdin
pub fn run_rulecheck_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = base_command(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run rulecheck");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for rulecheck")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse stdout as a single JSON document
pub fn json_of(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// numeric comparison between a context path and a constant
pub fn numeric_rule(path: &str, op: &str, constant: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "leftOperand": { "propertyPath": path, "operandKind": "Numeric" },
        "rightOperand": { "constantValue": constant, "operandKind": "Numeric" },
        "numericComparison": op
    })
}
