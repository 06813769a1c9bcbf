//! reduction of arrays to a single number

use rust_decimal::Decimal;
use tracing::trace;

use super::error::{Result, RuleError};
use super::types::AggregationMethod;
use super::value::Value;

/// reduce `values` to one decimal
///
/// every element must convert to a number. `Sum` of nothing is zero, the
/// other methods need at least one element.
pub fn aggregate(values: &[Value], method: AggregationMethod) -> Result<Decimal> {
    let numbers = values
        .iter()
        .map(Value::to_decimal)
        .collect::<Result<Vec<_>>>()?;

    trace!(%method, count = numbers.len(), "aggregating array");

    match method {
        AggregationMethod::Sum => sum(&numbers, method),
        AggregationMethod::Avg => {
            if numbers.is_empty() {
                return Err(RuleError::EmptySequence { method });
            }
            let total = sum(&numbers, method)?;
            total
                .checked_div(Decimal::from(numbers.len()))
                .ok_or(RuleError::ArithmeticOverflow { method })
        }
        AggregationMethod::Max => numbers
            .into_iter()
            .max()
            .ok_or(RuleError::EmptySequence { method }),
        AggregationMethod::Min => numbers
            .into_iter()
            .min()
            .ok_or(RuleError::EmptySequence { method }),
    }
}

fn sum(numbers: &[Decimal], method: AggregationMethod) -> Result<Decimal> {
    numbers.iter().try_fold(Decimal::ZERO, |acc, n| {
        acc.checked_add(*n)
            .ok_or(RuleError::ArithmeticOverflow { method })
    })
}
