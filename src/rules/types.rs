//! rule definitions: operands, expressions and the operators between them

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// how an operand is shaped once resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandKind {
    /// a single value compared as text
    Text,
    /// a single value compared as a number
    Numeric,
    /// a sequence of values, never aggregated
    Array,
    /// a sequence reduced to one number by an [`AggregationMethod`]
    #[serde(alias = "ArrayAggregation")]
    ArrayAggregate,
}

impl OperandKind {
    /// resolves to exactly one value
    pub fn is_single_value(self) -> bool {
        matches!(
            self,
            OperandKind::Text | OperandKind::Numeric | OperandKind::ArrayAggregate
        )
    }

    /// resolves to a sequence
    pub fn is_array(self) -> bool {
        self == OperandKind::Array
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::Text => write!(f, "Text"),
            OperandKind::Numeric => write!(f, "Numeric"),
            OperandKind::Array => write!(f, "Array"),
            OperandKind::ArrayAggregate => write!(f, "ArrayAggregate"),
        }
    }
}

/// reduction of a sequence to one number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationMethod {
    Sum,
    Avg,
    Min,
    Max,
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMethod::Sum => write!(f, "sum"),
            AggregationMethod::Avg => write!(f, "avg"),
            AggregationMethod::Min => write!(f, "min"),
            AggregationMethod::Max => write!(f, "max"),
        }
    }
}

/// numeric comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericComparison {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl fmt::Display for NumericComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericComparison::Equal => write!(f, "=="),
            NumericComparison::NotEqual => write!(f, "!="),
            NumericComparison::GreaterThan => write!(f, ">"),
            NumericComparison::GreaterThanOrEqual => write!(f, ">="),
            NumericComparison::LessThan => write!(f, "<"),
            NumericComparison::LessThanOrEqual => write!(f, "<="),
        }
    }
}

/// text comparison operators
///
/// `Equal`/`NotEqual` are case-sensitive, the rest ignore case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextComparison {
    Equal,
    NotEqual,
    StartsWith,
    EndsWith,
    Contains,
}

impl fmt::Display for TextComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextComparison::Equal => write!(f, "eq"),
            TextComparison::NotEqual => write!(f, "ne"),
            TextComparison::StartsWith => write!(f, "starts_with"),
            TextComparison::EndsWith => write!(f, "ends_with"),
            TextComparison::Contains => write!(f, "contains"),
        }
    }
}

/// membership and set operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayComparison {
    /// value vs array: the array holds the value
    IsAny,
    /// value vs array: the array does not hold the value
    IsNotAny,
    /// array vs array: the arrays share at least one value
    ContainsAny,
    /// array vs array: the arrays share no value
    DoesNotContainAny,
    /// array vs array: every right value is in the left array
    ContainsAll,
}

impl ArrayComparison {
    /// valid when both operands are arrays
    pub fn is_valid_for_arrays(self) -> bool {
        matches!(
            self,
            ArrayComparison::ContainsAny
                | ArrayComparison::DoesNotContainAny
                | ArrayComparison::ContainsAll
        )
    }

    /// valid when only the right operand is an array
    pub fn is_valid_for_membership(self) -> bool {
        matches!(self, ArrayComparison::IsAny | ArrayComparison::IsNotAny)
    }
}

impl fmt::Display for ArrayComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayComparison::IsAny => write!(f, "in"),
            ArrayComparison::IsNotAny => write!(f, "not_in"),
            ArrayComparison::ContainsAny => write!(f, "contains_any"),
            ArrayComparison::DoesNotContainAny => write!(f, "contains_none"),
            ArrayComparison::ContainsAll => write!(f, "contains_all"),
        }
    }
}

/// how per-element verdicts of an array operand are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressionAggregation {
    /// at least one element matches
    Any,
    /// every element matches (vacuously true when empty)
    All,
}

impl fmt::Display for ExpressionAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionAggregation::Any => write!(f, "any"),
            ExpressionAggregation::All => write!(f, "all"),
        }
    }
}

/// one side of a comparison
///
/// the value comes from `constant_value` if set, otherwise from resolving
/// `property_path` against the context. with neither, the context itself is
/// the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_path: Option<String>,

    #[serde(
        default,
        rename = "operandKind",
        alias = "parameterType",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<OperandKind>,

    /// required when `kind` is `ArrayAggregate`
    #[serde(
        default,
        alias = "arrayAggregationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub aggregation_method: Option<AggregationMethod>,

    /// path applied to every element of a resolved array
    #[serde(
        default,
        alias = "arrayAggregationArrayItemPropertyPath",
        skip_serializing_if = "Option::is_none"
    )]
    pub array_item_path: Option<String>,
}

impl Operand {
    /// operand with a literal value
    pub fn constant(kind: OperandKind, value: impl Into<Value>) -> Self {
        Self {
            constant_value: Some(value.into()),
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// operand resolved from the context by a dotted path
    pub fn path(kind: OperandKind, path: impl Into<String>) -> Self {
        Self {
            property_path: Some(path.into()),
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// operand that is the context itself
    pub fn context(kind: OperandKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// set the aggregation method
    pub fn with_aggregation(mut self, method: AggregationMethod) -> Self {
        self.aggregation_method = Some(method);
        self
    }

    /// set the per-element path
    pub fn with_item_path(mut self, path: impl Into<String>) -> Self {
        self.array_item_path = Some(path.into());
        self
    }

    /// the property path, unless blank
    pub fn effective_path(&self) -> Option<&str> {
        non_blank(self.property_path.as_deref())
    }

    /// the per-element path, unless blank
    pub fn effective_item_path(&self) -> Option<&str> {
        non_blank(self.array_item_path.as_deref())
    }

    /// both a constant and a property path are set
    pub fn has_conflicting_source(&self) -> bool {
        self.constant_value.is_some() && self.effective_path().is_some()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match (&self.constant_value, self.effective_path()) {
            (Some(value), _) => value.to_string(),
            (None, Some(path)) => path.to_string(),
            (None, None) => "$context".to_string(),
        };

        let source = match self.effective_item_path() {
            Some(item) => format!("{}[].{}", source, item),
            None => source,
        };

        match (self.kind, self.aggregation_method) {
            (Some(OperandKind::ArrayAggregate), Some(method)) => {
                write!(f, "{}({})", method, source)
            }
            _ => write!(f, "{}", source),
        }
    }
}

/// one comparison between two operands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    #[serde(rename = "leftOperand", alias = "leftParameter")]
    pub left: Operand,

    #[serde(rename = "rightOperand", alias = "rightParameter")]
    pub right: Operand,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_comparison: Option<NumericComparison>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_comparison: Option<TextComparison>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_comparison: Option<ArrayComparison>,

    /// required when the left operand is an array and the right is not
    #[serde(
        default,
        rename = "expressionAggregationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub expression_aggregation: Option<ExpressionAggregation>,
}

impl Expression {
    /// create an expression without any operator
    pub fn new(left: Operand, right: Operand) -> Self {
        Self {
            left,
            right,
            ..Default::default()
        }
    }

    pub fn numeric(mut self, op: NumericComparison) -> Self {
        self.numeric_comparison = Some(op);
        self
    }

    pub fn text(mut self, op: TextComparison) -> Self {
        self.text_comparison = Some(op);
        self
    }

    pub fn array(mut self, op: ArrayComparison) -> Self {
        self.array_comparison = Some(op);
        self
    }

    pub fn aggregate_with(mut self, aggregation: ExpressionAggregation) -> Self {
        self.expression_aggregation = Some(aggregation);
        self
    }

    fn operator_symbol(&self) -> String {
        if let Some(op) = self.numeric_comparison {
            op.to_string()
        } else if let Some(op) = self.text_comparison {
            op.to_string()
        } else if let Some(op) = self.array_comparison {
            op.to_string()
        } else {
            "?".to_string()
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expression_aggregation {
            Some(agg) if self.left.kind == Some(OperandKind::Array) => write!(
                f,
                "{}({}) {} {}",
                agg,
                self.left,
                self.operator_symbol(),
                self.right
            ),
            _ => write!(
                f,
                "{} {} {}",
                self.left,
                self.operator_symbol(),
                self.right
            ),
        }
    }
}
