//! error types for rule evaluation

use std::fmt;

use thiserror::Error;

use super::types::{AggregationMethod, ArrayComparison, OperandKind};

pub type Result<T, E = RuleError> = std::result::Result<T, E>;

/// where an aggregation method was expected but missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationSite {
    /// `ArrayAggregate` operand without `aggregationMethod`
    Operand,
    /// array-vs-value expression without `expressionAggregationMethod`
    Expression,
}

impl fmt::Display for AggregationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationSite::Operand => {
                write!(f, "operand is ArrayAggregate but no aggregation method is set")
            }
            AggregationSite::Expression => write!(
                f,
                "left operand is an array but no expression aggregation method (All/Any) is set"
            ),
        }
    }
}

/// error returned by resolution, extraction, aggregation and comparison
///
/// every variant describes a mistake in the rule or a type mismatch in the
/// data; none of them is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("operand defines both a constant value and a property path, only one is allowed")]
    ConflictingSource,

    #[error("operand kind {} cannot be extracted as {expected}", kind_name(.actual))]
    InvalidParameterType {
        expected: &'static str,
        actual: Option<OperandKind>,
    },

    #[error("missing aggregation method: {0}")]
    MissingAggregationMethod(AggregationSite),

    #[error("{operation} is not supported {shape}")]
    UnsupportedOperation {
        operation: String,
        shape: &'static str,
    },

    #[error("no {0} provided")]
    MissingComparisonOperator(&'static str),

    #[error("both a numeric and a text comparison are set, only one is allowed")]
    ConflictingComparison,

    #[error(
        "array comparison {} is not valid when both operands are arrays",
        comparison_name(.comparison)
    )]
    InvalidComparisonForShape { comparison: Option<ArrayComparison> },

    #[error(
        "operand kind combination {} / {} is not supported",
        kind_name(.left),
        kind_name(.right)
    )]
    UnsupportedParameterCombination {
        left: Option<OperandKind>,
        right: Option<OperandKind>,
    },

    #[error("cannot resolve '{path}' against a null context")]
    NullContext { path: String },

    #[error("property '{segment}' not found while resolving '{path}'{}", hint(.suggestion))]
    PropertyNotFound {
        path: String,
        segment: String,
        suggestion: Option<String>,
    },

    #[error("value at '{path}' is {found}, not an array")]
    NotAnArray { path: String, found: String },

    #[error("cannot convert {found} to {target}")]
    TypeConversion { found: String, target: &'static str },

    #[error("cannot compute {method} of an empty array")]
    EmptySequence { method: AggregationMethod },

    #[error("arithmetic overflow while computing {method}")]
    ArithmeticOverflow { method: AggregationMethod },
}

fn kind_name(kind: &Option<OperandKind>) -> String {
    kind.map(|k| k.to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

fn comparison_name(comparison: &Option<ArrayComparison>) -> String {
    comparison
        .map(|c| format!("{:?}", c))
        .unwrap_or_else(|| "(not set)".to_string())
}

fn hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(", did you mean '{}'?", s))
        .unwrap_or_default()
}
