//! expression evaluator
//!
//! classifies an expression by the kinds of its operands, extracts both sides
//! and hands them to the matching comparator

use std::fmt;

use tracing::debug;

use super::compare::{compare_each, compare_membership, compare_sequences, compare_values};
use super::error::{Result, RuleError};
use super::extract::{extract_sequence, extract_single};
use super::types::{Expression, OperandKind};
use super::value::Value;

/// the pairing of operand shapes an expression compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// single value vs single value
    ValueValue,
    /// array vs array
    ArrayArray,
    /// array vs single value
    ArrayValue,
    /// single value vs array
    ValueArray,
}

impl Shape {
    /// classify a pair of operand kinds
    ///
    /// `None` when either kind is unset
    pub fn classify(left: Option<OperandKind>, right: Option<OperandKind>) -> Option<Shape> {
        let (left, right) = (left?, right?);

        Some(match (left.is_array(), right.is_array()) {
            (false, false) => Shape::ValueValue,
            (true, true) => Shape::ArrayArray,
            (true, false) => Shape::ArrayValue,
            (false, true) => Shape::ValueArray,
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::ValueValue => write!(f, "value/value"),
            Shape::ArrayArray => write!(f, "array/array"),
            Shape::ArrayValue => write!(f, "array/value"),
            Shape::ValueArray => write!(f, "value/array"),
        }
    }
}

/// evaluate an expression with both operands resolved against `context`
pub fn evaluate(expression: &Expression, context: Option<&Value>) -> Result<bool> {
    evaluate_with(expression, context, context)
}

/// evaluate an expression with separate contexts for each operand
///
/// the left operand is always extracted before the right one, so the first
/// reported failure is deterministic.
pub fn evaluate_with(
    expression: &Expression,
    left: Option<&Value>,
    right: Option<&Value>,
) -> Result<bool> {
    let shape = Shape::classify(expression.left.kind, expression.right.kind).ok_or(
        RuleError::UnsupportedParameterCombination {
            left: expression.left.kind,
            right: expression.right.kind,
        },
    )?;

    debug!(%shape, %expression, "evaluating expression");

    let verdict = match shape {
        Shape::ValueValue => {
            let l = extract_single(&expression.left, left)?;
            let r = extract_single(&expression.right, right)?;
            compare_values(expression, &l, &r)
        }
        Shape::ArrayArray => {
            match expression.array_comparison {
                Some(op) if op.is_valid_for_arrays() => {}
                comparison => return Err(RuleError::InvalidComparisonForShape { comparison }),
            }
            let l = extract_sequence(&expression.left, left)?;
            let r = extract_sequence(&expression.right, right)?;
            compare_sequences(expression, &l, &r)
        }
        Shape::ArrayValue => {
            let l = extract_sequence(&expression.left, left)?;
            let r = extract_single(&expression.right, right)?;
            compare_each(expression, &l, &r)
        }
        Shape::ValueArray => {
            let l = extract_single(&expression.left, left)?;
            let r = extract_sequence(&expression.right, right)?;
            compare_membership(expression, &l, &r)
        }
    }?;

    debug!(%shape, verdict, "expression evaluated");
    Ok(verdict)
}
