//! # **Value Module** - *Unified Cell Value Container*
//!
//! Contains the `Value` enum, the single type universe for cell payloads
//! flowing through ingestion, indexing, filtering and persistence, plus
//! the `ValueType` tag carried by field descriptors.
//!
//! ## Behaviour
//! - `Num` wraps `f64`; `Eq`/`Hash` go through `to_bits`, so NaN equals
//!   NaN under this convention and values are usable as index-map keys.
//! - `Display` is the canonical string form used for partition keys and
//!   the serialized shape: integral floats print without a fractional
//!   part, so a CSV-born `1` round-trips as `"1"`.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use num_traits::ToPrimitive;

use crate::enums::error::MinfacetError;

/// The primitive type tag of a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// UTF-8 text.
    Str,
    /// `f64` numbers.
    Num,
    /// Booleans.
    Bool,
    /// Opaque object values, carried in string form. The optional
    /// constructor name on the descriptor is preserved but never
    /// dispatched on.
    Object,
}

impl ValueType {
    /// The language-neutral tag used in the serialized shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Str => "string",
            ValueType::Num => "number",
            ValueType::Bool => "boolean",
            ValueType::Object => "object",
        }
    }

    /// Parses a serialized tag.
    pub fn parse(tag: &str) -> Result<ValueType, MinfacetError> {
        match tag {
            "string" => Ok(ValueType::Str),
            "number" => Ok(ValueType::Num),
            "boolean" => Ok(ValueType::Bool),
            "object" => Ok(ValueType::Object),
            other => Err(MinfacetError::Metadata {
                message: format!("unknown typeOfValue '{}'", other),
            }),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// # Value
///
/// A single cell value.
///
/// ## Example
/// ```rust
/// use minfacet::Value;
///
/// let v = Value::from("red");
/// assert_eq!(v.to_string(), "red");
/// assert_eq!(Value::num(3).to_string(), "3");
/// assert_eq!(Value::from(2.5).to_string(), "2.5");
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number (always `f64`).
    Num(f64),
    /// Text.
    Str(String),
}

impl Value {
    /// Constructs a numeric value from any Rust numeric type.
    #[inline]
    pub fn num<T: ToPrimitive>(n: T) -> Value {
        Value::Num(n.to_f64().unwrap_or(f64::NAN))
    }

    /// True for `Value::Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric payload, if any.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// String payload, if any.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Decodes the canonical string form under a type tag; the reverse
    /// of `Display` for values serialized by the persistence layer.
    pub fn parse_typed(text: &str, type_of_value: ValueType) -> Result<Value, MinfacetError> {
        match type_of_value {
            ValueType::Str | ValueType::Object => Ok(Value::Str(text.to_string())),
            ValueType::Bool => match text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => Err(MinfacetError::Metadata {
                    message: format!("'{}' is not a boolean value", other),
                }),
            },
            ValueType::Num => text.parse::<f64>().map(Value::Num).map_err(|_| {
                MinfacetError::Metadata {
                    message: format!("'{}' is not a numeric value", text),
                }
            }),
        }
    }

    /// Converts to the JSON value used by dense-column serialization.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Num(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Converts from a JSON value. Containers are rejected - cell
    /// payloads are scalar.
    pub fn from_json(json: &serde_json::Value) -> Result<Value, MinfacetError> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => Ok(Value::Num(n.as_f64().unwrap_or(f64::NAN))),
            serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
            other => Err(MinfacetError::Metadata {
                message: format!("cell values must be scalar, got {}", other),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Num(n) => n.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Num(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::num(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::num(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::num(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::from("a").to_string(), "a");
        assert_eq!(Value::num(42).to_string(), "42");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_nan_equality_convention() {
        let a = Value::Num(f64::NAN);
        let b = Value::Num(f64::NAN);
        assert_eq!(a, b);
        assert_ne!(Value::Num(0.0), Value::Num(-0.0));
    }

    #[test]
    fn test_parse_typed() {
        assert_eq!(
            Value::parse_typed("3.5", ValueType::Num).unwrap(),
            Value::Num(3.5)
        );
        assert_eq!(
            Value::parse_typed("true", ValueType::Bool).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Value::parse_typed("x", ValueType::Str).unwrap(),
            Value::from("x")
        );
        assert!(Value::parse_typed("x", ValueType::Num).is_err());
        assert!(Value::parse_typed("yes", ValueType::Bool).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        for v in [
            Value::Null,
            Value::Bool(false),
            Value::Num(7.25),
            Value::from("seven"),
        ] {
            assert_eq!(Value::from_json(&v.to_json()).unwrap(), v);
        }
        assert!(Value::from_json(&serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(ValueType::parse("number").unwrap(), ValueType::Num);
        assert_eq!(ValueType::Num.as_str(), "number");
        assert!(ValueType::parse("decimal").is_err());
    }
}
