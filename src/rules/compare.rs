//! comparison of resolved operands
//!
//! one function per operand shape. all of them are pure; the expression only
//! supplies the operators.

use super::error::{AggregationSite, Result, RuleError};
use super::types::{
    ArrayComparison, Expression, ExpressionAggregation, NumericComparison, TextComparison,
};
use super::value::Value;

/// the operator used between two single values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarComparison {
    Numeric(NumericComparison),
    Text(TextComparison),
}

impl ScalarComparison {
    /// pick the numeric or text operator of an expression
    ///
    /// exactly one of them must be set.
    pub fn select(expression: &Expression) -> Result<Self> {
        match (expression.numeric_comparison, expression.text_comparison) {
            (Some(_), Some(_)) => Err(RuleError::ConflictingComparison),
            (Some(op), None) => Ok(ScalarComparison::Numeric(op)),
            (None, Some(op)) => Ok(ScalarComparison::Text(op)),
            (None, None) => Err(RuleError::MissingComparisonOperator(
                "numeric or text comparison",
            )),
        }
    }

    /// apply the operator to two values
    pub fn apply(self, left: &Value, right: &Value) -> Result<bool> {
        match self {
            ScalarComparison::Numeric(op) => {
                compare_numbers(op, left.to_decimal()?, right.to_decimal()?)
            }
            ScalarComparison::Text(op) => compare_text(op, left.to_text()?, right.to_text()?),
        }
    }
}

/// single value vs single value
pub fn compare_values(expression: &Expression, left: &Value, right: &Value) -> Result<bool> {
    ScalarComparison::select(expression)?.apply(left, right)
}

/// array vs array, using the set operators
pub fn compare_sequences(expression: &Expression, left: &[Value], right: &[Value]) -> Result<bool> {
    let op = expression
        .array_comparison
        .ok_or_else(|| missing_array_comparison("when both operands are arrays"))?;

    match op {
        ArrayComparison::ContainsAny => Ok(intersects(left, right)),
        ArrayComparison::DoesNotContainAny => Ok(!intersects(left, right)),
        ArrayComparison::ContainsAll => Ok(right.iter().all(|r| left.contains(r))),
        ArrayComparison::IsAny | ArrayComparison::IsNotAny => {
            Err(RuleError::UnsupportedOperation {
                operation: format!("array comparison {:?}", op),
                shape: "when both operands are arrays",
            })
        }
    }
}

/// array vs single value
///
/// compares every left element against the right value and combines the
/// verdicts with `All` or `Any`. the operator is checked before iterating so
/// an empty array still reports a malformed expression.
pub fn compare_each(expression: &Expression, left: &[Value], right: &Value) -> Result<bool> {
    let aggregation = expression
        .expression_aggregation
        .ok_or(RuleError::MissingAggregationMethod(AggregationSite::Expression))?;

    let comparison = ScalarComparison::select(expression)?;

    match aggregation {
        ExpressionAggregation::All => {
            for item in left {
                if !comparison.apply(item, right)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        ExpressionAggregation::Any => {
            for item in left {
                if comparison.apply(item, right)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// single value vs array, using the membership operators
pub fn compare_membership(expression: &Expression, left: &Value, right: &[Value]) -> Result<bool> {
    let op = expression
        .array_comparison
        .ok_or_else(|| missing_array_comparison("when only the right operand is an array"))?;

    match op {
        ArrayComparison::IsAny => Ok(right.contains(left)),
        ArrayComparison::IsNotAny => Ok(!right.contains(left)),
        ArrayComparison::ContainsAny
        | ArrayComparison::DoesNotContainAny
        | ArrayComparison::ContainsAll => Err(RuleError::UnsupportedOperation {
            operation: format!("array comparison {:?}", op),
            shape: "when only the right operand is an array",
        }),
    }
}

/// an array shape without any array operator is an unsupported operation
pub(crate) fn missing_array_comparison(shape: &'static str) -> RuleError {
    RuleError::UnsupportedOperation {
        operation: "missing array comparison".to_string(),
        shape,
    }
}

fn intersects(left: &[Value], right: &[Value]) -> bool {
    left.iter().any(|l| right.contains(l))
}

// ============================================================================
// Scalar Operators
// ============================================================================

fn compare_numbers(
    op: NumericComparison,
    left: rust_decimal::Decimal,
    right: rust_decimal::Decimal,
) -> Result<bool> {
    Ok(match op {
        NumericComparison::Equal => left == right,
        NumericComparison::NotEqual => left != right,
        NumericComparison::GreaterThan => left > right,
        NumericComparison::GreaterThanOrEqual => left >= right,
        NumericComparison::LessThan => left < right,
        NumericComparison::LessThanOrEqual => left <= right,
    })
}

fn compare_text(op: TextComparison, left: Option<String>, right: Option<String>) -> Result<bool> {
    match op {
        TextComparison::Equal => Ok(left == right),
        TextComparison::NotEqual => Ok(left != right),
        _ => {
            // substring checks never match a missing side
            let (Some(left), Some(right)) = (left, right) else {
                return Ok(false);
            };
            let left = left.to_lowercase();
            let right = right.to_lowercase();

            Ok(match op {
                TextComparison::StartsWith => left.starts_with(&right),
                TextComparison::EndsWith => left.ends_with(&right),
                _ => left.contains(&right),
            })
        }
    }
}
