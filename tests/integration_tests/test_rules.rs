// integration tests for the rules command

use crate::common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::{Path, PathBuf};

fn create_valid_rules(dir: &Path) -> PathBuf {
    write_json(
        dir,
        "rules.json",
        &json!({
            "rules": {
                "large_order": numeric_rule("Order.Total", "GreaterThanOrEqual", json!(100)),
                "vip": {
                    "leftOperand": { "propertyPath": "Customer.Tier", "operandKind": "Text" },
                    "rightOperand": { "constantValue": ["gold", "platinum"], "operandKind": "Array" },
                    "arrayComparison": "IsAny"
                }
            }
        }),
    )
}

fn create_invalid_rules(dir: &Path) -> PathBuf {
    write_json(
        dir,
        "rules.json",
        &json!({
            "rules": {
                "ok": numeric_rule("Total", "Equal", json!(1)),
                "bad_shape": {
                    "leftOperand": { "propertyPath": "Tags", "operandKind": "Array" },
                    "rightOperand": { "constantValue": ["a"], "operandKind": "Array" },
                    "arrayComparison": "IsAny"
                },
                "no_method": {
                    "leftOperand": { "propertyPath": "Lines", "operandKind": "ArrayAggregate" },
                    "rightOperand": { "constantValue": 1, "operandKind": "Numeric" },
                    "numericComparison": "Equal"
                }
            }
        }),
    )
}

// ============================================================================
// rules path
// ============================================================================

#[test]
fn test_rules_path_uses_flag() {
    let output = run_rulecheck(&["--rules", "/tmp/custom-rules.json", "rules", "path"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "/tmp/custom-rules.json\n");
}

#[test]
fn test_rules_path_uses_env_var() {
    let output =
        run_rulecheck_with_env(&["rules", "path"], &[("RULECHECK_RULES", "/tmp/env-rules.json")]);
    assert_eq!(stdout_of(&output), "/tmp/env-rules.json\n");
}

#[test]
fn test_rules_path_flag_overrides_env_var() {
    let output = run_rulecheck_with_env(
        &["--rules", "/tmp/flag.json", "rules", "path"],
        &[("RULECHECK_RULES", "/tmp/env.json")],
    );
    assert_eq!(stdout_of(&output), "/tmp/flag.json\n");
}

#[test]
fn test_rules_path_default_location() {
    let dir = create_test_dir();
    let output = run_rulecheck_with_env(
        &["rules", "path"],
        &[("HOME", dir.path().to_str().unwrap())],
    );
    let expected = dir.path().join(".rulecheck").join("rules.json");
    assert_eq!(stdout_of(&output).trim(), expected.to_str().unwrap());
}

// ============================================================================
// rules list / show
// ============================================================================

#[test]
fn test_rules_list_text() {
    let dir = create_test_dir();
    let rules = create_valid_rules(dir.path());

    let output = run_rulecheck(&["--rules", rules.to_str().unwrap(), "--no-json", "rules", "list"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("large_order"));
    assert!(lines[0].ends_with("Order.Total >= 100"));
    assert!(lines[1].starts_with("vip"));
    assert!(lines[1].ends_with("Customer.Tier in [\"gold\", \"platinum\"]"));
}

#[test]
fn test_rules_list_json() {
    let dir = create_test_dir();
    let rules = create_valid_rules(dir.path());

    let output = run_rulecheck(&["--rules", rules.to_str().unwrap(), "--json", "rules", "list"]);

    let json = json_of(&output);
    assert_eq!(
        json["result"][0],
        json!({ "name": "large_order", "expression": "Order.Total >= 100" })
    );
    assert_eq!(json["result"].as_array().unwrap().len(), 2);
}

#[test]
fn test_rules_show() {
    let dir = create_test_dir();
    let rules = create_valid_rules(dir.path());

    let output = run_rulecheck(&[
        "--rules",
        rules.to_str().unwrap(),
        "--no-json",
        "rules",
        "show",
        "large_order",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let shown: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(
        shown,
        numeric_rule("Order.Total", "GreaterThanOrEqual", json!(100))
    );
}

#[test]
fn test_rules_show_unknown() {
    let dir = create_test_dir();
    let rules = create_valid_rules(dir.path());

    let output = run_rulecheck(&[
        "--rules",
        rules.to_str().unwrap(),
        "--no-json",
        "rules",
        "show",
        "vpi",
    ]);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).contains("rule 'vpi' not found"));
}

// ============================================================================
// rules verify / default
// ============================================================================

#[test]
fn test_rules_verify_valid() {
    let dir = create_test_dir();
    let rules = create_valid_rules(dir.path());

    let output = run_rulecheck(&["--rules", rules.to_str().unwrap(), "--no-json", "rules", "verify"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("Rule file is valid"));
}

#[test]
fn test_rules_verify_reports_each_problem() {
    let dir = create_test_dir();
    let rules = create_invalid_rules(dir.path());

    let output = run_rulecheck(&["--rules", rules.to_str().unwrap(), "--no-json", "rules", "verify"]);

    assert_eq!(output.status.code(), Some(5));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("2 error(s)"));
    assert!(stdout.contains("rules.bad_shape: array comparison IsAny is not valid"));
    assert!(stdout.contains("rules.no_method: missing aggregation method"));
    assert!(!stdout.contains("rules.ok"));
}

#[test]
fn test_rules_verify_json() {
    let dir = create_test_dir();
    let rules = create_invalid_rules(dir.path());

    let output = run_rulecheck(&["--rules", rules.to_str().unwrap(), "--json", "rules", "verify"]);

    assert_eq!(output.status.code(), Some(5));
    let json = json_of(&output);
    assert_eq!(json["error"]["code"], json!(-32005));
    assert_eq!(json["error"]["data"]["problems"].as_array().unwrap().len(), 2);
}

#[test]
fn test_rules_verify_malformed_file() {
    let dir = create_test_dir();
    let rules = write_text(dir.path(), "rules.json", "{ \"rules\": [ }");

    let output = run_rulecheck(&["--rules", rules.to_str().unwrap(), "--no-json", "rules", "verify"]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr_of(&output).contains("Failed to parse rule file"));
}

#[test]
fn test_rules_default_is_a_valid_rule_file() {
    let output = run_rulecheck(&["rules", "default"]);
    assert_eq!(output.status.code(), Some(0));

    let dir = create_test_dir();
    let rules = write_text(dir.path(), "rules.json", &stdout_of(&output));

    let output = run_rulecheck(&["--rules", rules.to_str().unwrap(), "--no-json", "rules", "verify"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout_of(&output));
}
