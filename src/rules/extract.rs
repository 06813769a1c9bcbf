//! operand extraction
//!
//! turns an [`Operand`] plus an optional context into either a single value
//! or a sequence.

use super::aggregate::aggregate;
use super::error::{AggregationSite, Result, RuleError};
use super::resolve::{as_sequence, resolve, resolve_sequence};
use super::types::{Operand, OperandKind};
use super::value::Value;

/// extract the single value an operand describes
///
/// `ArrayAggregate` operands are resolved to a sequence and reduced.
pub fn extract_single(operand: &Operand, context: Option<&Value>) -> Result<Value> {
    let kind = match operand.kind {
        Some(kind) if kind.is_single_value() => kind,
        actual => {
            return Err(RuleError::InvalidParameterType {
                expected: "a single value",
                actual,
            })
        }
    };

    check_source(operand)?;

    match kind {
        OperandKind::ArrayAggregate => {
            let method = operand
                .aggregation_method
                .ok_or(RuleError::MissingAggregationMethod(AggregationSite::Operand))?;
            let values = sequence_source(operand, context)?;
            Ok(Value::Number(aggregate(&values, method)?))
        }
        _ => match &operand.constant_value {
            Some(value) => Ok(value.clone()),
            None => resolve(context, operand.effective_path()),
        },
    }
}

/// extract the sequence an `Array` operand describes
pub fn extract_sequence(operand: &Operand, context: Option<&Value>) -> Result<Vec<Value>> {
    if operand.kind != Some(OperandKind::Array) {
        return Err(RuleError::InvalidParameterType {
            expected: "an array",
            actual: operand.kind,
        });
    }

    check_source(operand)?;

    sequence_source(operand, context)
}

fn check_source(operand: &Operand) -> Result<()> {
    if operand.has_conflicting_source() {
        return Err(RuleError::ConflictingSource);
    }
    Ok(())
}

/// constant sequence, or the sequence resolved from the context
///
/// the item path only applies to resolved sequences
fn sequence_source(operand: &Operand, context: Option<&Value>) -> Result<Vec<Value>> {
    match &operand.constant_value {
        Some(constant) => as_sequence(constant, "<constant>"),
        None => resolve_sequence(
            context,
            operand.effective_path(),
            operand.effective_item_path(),
        ),
    }
}
