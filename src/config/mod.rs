mod schema;

pub use schema::{RuleFile, Settings};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::rules::{
    self, AggregationMethod, ArrayComparison, Expression, ExpressionAggregation,
    NumericComparison, Operand, OperandKind, TextComparison, Value,
};

const RULES_ENV_VAR: &str = "RULECHECK_RULES";

/// resolve the rule file path: explicit override, then env var, then
/// `~/.rulecheck/rules.json`
pub fn get_rules_path(override_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(expand(path));
    }

    if let Ok(path) = env::var(RULES_ENV_VAR) {
        if !path.trim().is_empty() {
            return Ok(expand(&path));
        }
    }

    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".rulecheck")
        .join("rules.json"))
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}

pub fn load(path: &Path) -> Result<RuleFile> {
    if !path.exists() {
        return Err(anyhow!("rule file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file: {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse rule file: {}", path.display()))
}

/// parse rule file text, JSON first and JSON5 as a fallback
pub fn parse(text: &str) -> Result<RuleFile> {
    parse_document(text)
}

/// parse any JSON or JSON5 document
///
/// the JSON error is reported when both parsers fail, since most files are
/// plain JSON.
pub fn parse_document<T: DeserializeOwned>(text: &str) -> Result<T> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => json5::from_str(text).map_err(|json5_err| {
            tracing::debug!(%json5_err, "JSON5 fallback failed");
            anyhow!("invalid JSON: {}", json_err)
        }),
    }
}

/// load a context document
pub fn load_context(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read context file: {}", path.display()))?;

    parse_context(&content)
        .with_context(|| format!("Failed to parse context file: {}", path.display()))
}

pub fn parse_context(text: &str) -> Result<Value> {
    let json: serde_json::Value = parse_document(text)?;
    Ok(Value::try_from(json)?)
}

/// Verify a rule file and return a list of problems
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let file = load(path)?;
    Ok(verify_rules(&file))
}

/// structural problems of every rule, prefixed with `rules.<name>`
pub fn verify_rules(file: &RuleFile) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, expression) in &file.rules {
        let prefix = format!("rules.{}", name);

        if name.trim().is_empty() {
            errors.push(format!("{}: rule name must not be blank", prefix));
        }

        for problem in rules::verify::check(expression) {
            errors.push(format!("{}: {}", prefix, problem));
        }
    }

    errors
}

/// generates a rule file with one example per operand shape
pub fn default_with_examples() -> RuleFile {
    let mut file = RuleFile::default();

    file.rules.insert(
        "large_order".to_string(),
        Expression::new(
            Operand::path(OperandKind::Numeric, "Order.Total"),
            Operand::constant(OperandKind::Numeric, 100),
        )
        .numeric(NumericComparison::GreaterThanOrEqual),
    );

    file.rules.insert(
        "company_email".to_string(),
        Expression::new(
            Operand::path(OperandKind::Text, "Customer.Email"),
            Operand::constant(OperandKind::Text, "@example.com"),
        )
        .text(TextComparison::EndsWith),
    );

    file.rules.insert(
        "cheap_lines".to_string(),
        Expression::new(
            Operand::path(OperandKind::ArrayAggregate, "Order.Lines")
                .with_aggregation(AggregationMethod::Max)
                .with_item_path("Price"),
            Operand::constant(OperandKind::Numeric, 50),
        )
        .numeric(NumericComparison::LessThan),
    );

    file.rules.insert(
        "all_in_stock".to_string(),
        Expression::new(
            Operand::path(OperandKind::Array, "Order.Lines").with_item_path("InStock"),
            Operand::constant(OperandKind::Text, "true"),
        )
        .text(TextComparison::Equal)
        .aggregate_with(ExpressionAggregation::All),
    );

    file.rules.insert(
        "has_priority_tag".to_string(),
        Expression::new(
            Operand::path(OperandKind::Array, "Order.Tags"),
            Operand::constant(OperandKind::Array, vec!["express", "priority"]),
        )
        .array(ArrayComparison::ContainsAny),
    );

    file.rules.insert(
        "eu_shipping".to_string(),
        Expression::new(
            Operand::path(OperandKind::Text, "Customer.Country"),
            Operand::constant(OperandKind::Array, vec!["DE", "FR", "NL"]),
        )
        .array(ArrayComparison::IsAny),
    );

    file
}
