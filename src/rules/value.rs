//! dynamic values that operands resolve to and contexts are made of

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::RuleError;

/// a host object exposing named properties to path resolution
///
/// implement this for domain types that should be usable as a context
/// without first converting them into a [`Value::Record`].
pub trait PropertySource: fmt::Debug + Send + Sync {
    /// read a property by name, `None` if the object has no such property
    fn property(&self, name: &str) -> Option<Value>;

    /// names of all readable properties
    ///
    /// used for "did you mean" hints and when the object is serialized
    fn property_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// elements of this object when it is a collection
    fn items(&self) -> Option<Vec<Value>> {
        None
    }

    /// short name used in error messages
    fn type_name(&self) -> &str {
        "object"
    }
}

/// a value that can be resolved, compared, or aggregated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub enum Value {
    /// absent value
    #[default]
    Null,
    /// boolean value
    Bool(bool),
    /// exact decimal number
    Number(Decimal),
    /// text value
    Text(String),
    /// ordered sequence of values
    List(Vec<Value>),
    /// named properties, addressable by path segments
    Record(BTreeMap<String, Value>),
    /// host object read through [`PropertySource`]
    Opaque(Arc<dyn PropertySource>),
}

impl Value {
    /// wrap a host object
    pub fn opaque(source: impl PropertySource + 'static) -> Self {
        Value::Opaque(Arc::new(source))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// name of the variant, or the host type name for opaque values
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Opaque(source) => source.type_name(),
        }
    }

    /// read a named property of a record or host object
    pub fn property(&self, name: &str) -> Option<Value> {
        match self {
            Value::Record(map) => map.get(name).cloned(),
            Value::Opaque(source) => source.property(name),
            _ => None,
        }
    }

    /// names of the readable properties of a record or host object
    pub fn property_names(&self) -> Vec<String> {
        match self {
            Value::Record(map) => map.keys().cloned().collect(),
            Value::Opaque(source) => source.property_names(),
            _ => Vec::new(),
        }
    }

    /// elements of a list or of a host collection
    ///
    /// text is never a collection here, even though it is made of characters
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::Opaque(source) => source.items(),
            _ => None,
        }
    }

    /// convert to an exact decimal
    ///
    /// numbers pass through, numeric text is parsed, booleans become 1 or 0
    pub fn to_decimal(&self) -> Result<Decimal, RuleError> {
        match self {
            Value::Number(d) => Ok(*d),
            Value::Text(s) => parse_decimal(s).ok_or_else(|| RuleError::TypeConversion {
                found: format!("text \"{}\"", s),
                target: "number",
            }),
            Value::Bool(b) => Ok(if *b { Decimal::ONE } else { Decimal::ZERO }),
            other => Err(RuleError::TypeConversion {
                found: other.type_name().to_string(),
                target: "number",
            }),
        }
    }

    /// convert to text, `None` for null
    pub fn to_text(&self) -> Result<Option<String>, RuleError> {
        match self {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            Value::Number(d) => Ok(Some(d.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(RuleError::TypeConversion {
                found: other.type_name().to_string(),
                target: "text",
            }),
        }
    }
}

/// parse decimal text, accepting scientific notation
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            // host objects are equal only to themselves
            (Value::Opaque(a), Value::Opaque(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(d) => write!(f, "{}", d),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Record(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Opaque(source) => write!(f, "<{}>", source.type_name()),
        }
    }
}

// ============================================================================
// JSON conversions
// ============================================================================

impl TryFrom<JsonValue> for Value {
    type Error = RuleError;

    fn try_from(json: JsonValue) -> Result<Self, Self::Error> {
        Ok(match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(number_to_decimal(&n)?),
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            JsonValue::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<_, RuleError>>()?,
            ),
        })
    }
}

fn number_to_decimal(n: &serde_json::Number) -> Result<Decimal, RuleError> {
    if let Some(i) = n.as_i64() {
        return Ok(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Decimal::from(u));
    }

    let text = n.to_string();
    parse_decimal(&text).ok_or_else(|| RuleError::TypeConversion {
        found: format!("number {}", text),
        target: "decimal",
    })
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Number(d) => decimal_to_json(d),
            Value::Text(s) => JsonValue::String(s),
            Value::List(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Record(map) => {
                JsonValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            Value::Opaque(source) => JsonValue::Object(
                source
                    .property_names()
                    .into_iter()
                    .filter_map(|name| {
                        let value = source.property(&name)?;
                        Some((name, value.into()))
                    })
                    .collect(),
            ),
        }
    }
}

/// integral decimals become JSON integers, everything else keeps its digits
fn decimal_to_json(d: Decimal) -> JsonValue {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return JsonValue::from(i);
        }
    }

    let text = d.normalize().to_string();
    match serde_json::from_str::<serde_json::Number>(&text) {
        Ok(n) => JsonValue::Number(n),
        Err(_) => JsonValue::String(text),
    }
}

// ============================================================================
// Native conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Number(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Record(map)
    }
}
