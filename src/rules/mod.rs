//! rule evaluation engine
//!
//! a rule is an [`Expression`]: two operands and the operator between them.
//! operands are constants or property paths resolved against a context, and
//! each one has a kind:
//! - `Text` / `Numeric`: a single value
//! - `Array`: a sequence of values
//! - `ArrayAggregate`: a sequence reduced to one number (sum, avg, min, max)
//!
//! the pairing of kinds decides which operator applies:
//! - value vs value: numeric or text comparison
//! - array vs array: contains any / contains none / contains all
//! - array vs value: per-element comparison combined with all / any
//! - value vs array: membership (is any / is not any)

mod aggregate;
mod compare;
mod error;
mod eval;
mod extract;
mod resolve;
mod types;
mod value;
pub mod verify;

pub use aggregate::aggregate;
pub use compare::{
    compare_each, compare_membership, compare_sequences, compare_values, ScalarComparison,
};
pub use error::{AggregationSite, Result, RuleError};
pub use eval::{evaluate, evaluate_with, Shape};
pub use extract::{extract_sequence, extract_single};
pub use resolve::{resolve, resolve_sequence};
pub use types::{
    AggregationMethod, ArrayComparison, Expression, ExpressionAggregation, NumericComparison,
    Operand, OperandKind, TextComparison,
};
pub use value::{PropertySource, Value};
