//! static validation of expressions
//!
//! finds structural mistakes without a context, so rule files can be checked
//! before any data is available.

use super::compare::{missing_array_comparison, ScalarComparison};
use super::error::{AggregationSite, RuleError};
use super::eval::Shape;
use super::resolve::as_sequence;
use super::types::{Expression, Operand, OperandKind};

/// list every structural problem of `expression`
///
/// an empty result means the expression can only fail on data (missing
/// properties, unconvertible values, empty arrays).
pub fn check(expression: &Expression) -> Vec<RuleError> {
    let mut problems = Vec::new();

    check_operand(&expression.left, &mut problems);
    check_operand(&expression.right, &mut problems);

    let Some(shape) = Shape::classify(expression.left.kind, expression.right.kind) else {
        problems.push(RuleError::UnsupportedParameterCombination {
            left: expression.left.kind,
            right: expression.right.kind,
        });
        return problems;
    };

    match shape {
        Shape::ValueValue => {
            if let Err(e) = ScalarComparison::select(expression) {
                problems.push(e);
            }
        }
        Shape::ArrayArray => match expression.array_comparison {
            Some(op) if op.is_valid_for_arrays() => {}
            comparison => problems.push(RuleError::InvalidComparisonForShape { comparison }),
        },
        Shape::ArrayValue => {
            if expression.expression_aggregation.is_none() {
                problems.push(RuleError::MissingAggregationMethod(
                    AggregationSite::Expression,
                ));
            }
            if let Err(e) = ScalarComparison::select(expression) {
                problems.push(e);
            }
        }
        Shape::ValueArray => match expression.array_comparison {
            None => problems.push(missing_array_comparison(
                "when only the right operand is an array",
            )),
            Some(op) if !op.is_valid_for_membership() => {
                problems.push(RuleError::UnsupportedOperation {
                    operation: format!("array comparison {:?}", op),
                    shape: "when only the right operand is an array",
                })
            }
            Some(_) => {}
        },
    }

    problems
}

fn check_operand(operand: &Operand, problems: &mut Vec<RuleError>) {
    if operand.has_conflicting_source() {
        problems.push(RuleError::ConflictingSource);
    }

    if operand.kind == Some(OperandKind::ArrayAggregate) && operand.aggregation_method.is_none() {
        problems.push(RuleError::MissingAggregationMethod(AggregationSite::Operand));
    }

    // constant sequences can be checked up front
    let wants_sequence = matches!(
        operand.kind,
        Some(OperandKind::Array) | Some(OperandKind::ArrayAggregate)
    );
    if let (true, Some(constant)) = (wants_sequence, &operand.constant_value) {
        if let Err(e) = as_sequence(constant, "<constant>") {
            problems.push(e);
        }
    }
}
