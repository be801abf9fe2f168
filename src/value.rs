use std::fmt;

use serde::Serialize;

/// A model instance resolved from a `<name>-id` request parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Name of the model the record belongs to
    pub model: String,
    /// Primary key used for the lookup
    pub pk: i64,
    /// Record contents
    pub data: serde_json::Value,
}

impl Record {
    /// Creates a new record.
    pub fn new(model: impl Into<String>, pk: i64, data: serde_json::Value) -> Self {
        Self {
            model: model.into(),
            pk,
            data,
        }
    }
}

/// A request parameter value.
///
/// Parameters arrive from the query string or form body as [`Value::Str`].
/// Once a field has cleaned them they carry the field's native type.
///
/// # Examples
///
/// ```
/// use api_contract::Value;
///
/// let raw = Value::from("10");
/// assert_eq!(raw.as_str(), Some("10"));
///
/// let cleaned = Value::Int(10);
/// assert_eq!(cleaned.as_i64(), Some(10));
/// assert_eq!(cleaned.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Blank optional value with no initial
    Null,
    /// Text; also the shape of every raw parameter
    Str(String),
    /// Integer
    Int(i64),
    /// Finite floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Resolved model instance
    Record(Record),
}

impl Value {
    /// Returns the string slice if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`Value::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is a [`Value::Float`] or [`Value::Int`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the boolean if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the record if this is a [`Value::Record`].
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Record(r) => write!(f, "{}(pk={})", r.model, r.pk),
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}
