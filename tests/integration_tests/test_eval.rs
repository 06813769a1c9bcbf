// integration tests for the eval command

use crate::common::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn order_context(dir: &std::path::Path, total: i64) -> std::path::PathBuf {
    write_json(
        dir,
        "context.json",
        &json!({ "Order": { "Total": total, "Tags": ["gift", "express"] } }),
    )
}

// ============================================================================
// verdict output
// ============================================================================

#[test]
fn test_eval_true_text_output() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Order.Total", "GreaterThanOrEqual", json!(100)),
    );
    let ctx = order_context(dir.path(), 150);

    let output = run_rulecheck(&[
        "--no-json",
        "eval",
        expr.to_str().unwrap(),
        "--context",
        ctx.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "true\n");
}

#[test]
fn test_eval_long_decimal_context_is_exact() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Total", "Equal", json!("12345678901234567.89")),
    );
    let ctx = write_text(dir.path(), "context.json", r#"{ "Total": 12345678901234567.89 }"#);

    let output = run_rulecheck(&[
        "--no-json",
        "eval",
        expr.to_str().unwrap(),
        "-c",
        ctx.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "true\n");
}

#[test]
fn test_eval_false_is_success_without_exit_status() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Order.Total", "GreaterThanOrEqual", json!(100)),
    );
    let ctx = order_context(dir.path(), 50);

    let output = run_rulecheck(&[
        "--no-json",
        "eval",
        expr.to_str().unwrap(),
        "-c",
        ctx.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "false\n");
}

#[test]
fn test_eval_false_with_exit_status() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Order.Total", "GreaterThanOrEqual", json!(100)),
    );
    let ctx = order_context(dir.path(), 50);

    let output = run_rulecheck(&[
        "--no-json",
        "eval",
        expr.to_str().unwrap(),
        "-c",
        ctx.to_str().unwrap(),
        "--exit-status",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_of(&output), "false\n");
}

#[test]
fn test_eval_json_output() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Order.Total", "GreaterThanOrEqual", json!(100)),
    );
    let ctx = order_context(dir.path(), 150);

    let output = run_rulecheck(&[
        "--json",
        "eval",
        expr.to_str().unwrap(),
        "-c",
        ctx.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        json_of(&output),
        json!({
            "jsonrpc": "2.0",
            "result": { "result": true, "expression": "Order.Total >= 100" },
            "id": null
        })
    );
}

#[test]
fn test_eval_piped_output_defaults_to_json() {
    let output = run_rulecheck_with_stdin(
        &["eval", "-"],
        &json!({
            "leftOperand": { "constantValue": 1, "operandKind": "Numeric" },
            "rightOperand": { "constantValue": 1, "operandKind": "Numeric" },
            "numericComparison": "Equal"
        })
        .to_string(),
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json_of(&output)["result"]["result"], json!(true));
}

#[test]
fn test_eval_quiet_prints_nothing() {
    let output = run_rulecheck_with_stdin(
        &["-q", "eval", "-"],
        &json!({
            "leftOperand": { "constantValue": 2, "operandKind": "Numeric" },
            "rightOperand": { "constantValue": 1, "operandKind": "Numeric" },
            "numericComparison": "GreaterThan"
        })
        .to_string(),
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "");
}

// ============================================================================
// expression shapes
// ============================================================================

#[test]
fn test_eval_json5_expression_from_stdin() {
    let expression = r#"{
        // membership check
        leftOperand: { constantValue: "ABC", operandKind: "Text" },
        rightOperand: { constantValue: ["A", "B", "C"], operandKind: "Array" },
        arrayComparison: "IsAny",
    }"#;

    let output = run_rulecheck_with_stdin(&["--no-json", "eval", "-"], expression);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "false\n");
}

#[test]
fn test_eval_array_against_context() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &json!({
            "leftOperand": { "propertyPath": "Order.Tags", "operandKind": "Array" },
            "rightOperand": { "constantValue": ["express", "priority"], "operandKind": "Array" },
            "arrayComparison": "ContainsAny"
        }),
    );
    let ctx = order_context(dir.path(), 1);

    let output = run_rulecheck(&[
        "--no-json",
        "eval",
        expr.to_str().unwrap(),
        "-c",
        ctx.to_str().unwrap(),
    ]);

    assert_eq!(stdout_of(&output), "true\n");
}

#[test]
fn test_eval_separate_left_and_right_contexts() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &json!({
            "leftOperand": { "propertyPath": "Total", "operandKind": "Numeric" },
            "rightOperand": { "propertyPath": "Limit", "operandKind": "Numeric" },
            "numericComparison": "LessThan"
        }),
    );
    let left = write_json(dir.path(), "left.json", &json!({ "Total": 80 }));
    let right = write_json(dir.path(), "right.json", &json!({ "Limit": 100 }));

    let output = run_rulecheck(&[
        "--no-json",
        "eval",
        expr.to_str().unwrap(),
        "--left-context",
        left.to_str().unwrap(),
        "--right-context",
        right.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "true\n");
}

// ============================================================================
// failures
// ============================================================================

#[test]
fn test_eval_rule_error_without_context() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Order.Total", "Equal", json!(1)),
    );

    let output = run_rulecheck(&["--no-json", "eval", expr.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr_of(&output).contains("null context"));
}

#[test]
fn test_eval_rule_error_json() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Order.Totl", "Equal", json!(1)),
    );
    let ctx = order_context(dir.path(), 1);

    let output = run_rulecheck(&[
        "--json",
        "eval",
        expr.to_str().unwrap(),
        "-c",
        ctx.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(3));
    let json = json_of(&output);
    assert_eq!(json["error"]["code"], json!(-32003));
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("did you mean 'Total'?"));
}

#[test]
fn test_eval_invalid_expression_file() {
    let dir = create_test_dir();
    let expr = write_text(dir.path(), "expr.json", "{ not an expression");

    let output = run_rulecheck(&["--no-json", "eval", expr.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).contains("Failed to parse expression"));
}

#[test]
fn test_eval_missing_context_file() {
    let dir = create_test_dir();
    let expr = write_json(
        dir.path(),
        "expr.json",
        &numeric_rule("Order.Total", "Equal", json!(1)),
    );
    let missing = dir.path().join("missing.json");

    let output = run_rulecheck(&[
        "--no-json",
        "eval",
        expr.to_str().unwrap(),
        "-c",
        missing.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).contains("Failed to read context file"));
}
