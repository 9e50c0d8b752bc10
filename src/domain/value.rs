//! Node values: a closed sum type over the JSON kinds the wire format knows.

use std::fmt;
use std::str::FromStr;

/// Kind tag of a [`Value`].
///
/// The lowercase names double as the primitive tags of the wire format
/// (`int=42`, `string=aGk`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    Array,
    Map,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
        }
    }

    /// Whether nodes of this kind own children.
    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Map)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ValueKind::String),
            "int" => Ok(ValueKind::Int),
            "float" => Ok(ValueKind::Float),
            "bool" => Ok(ValueKind::Bool),
            "array" => Ok(ValueKind::Array),
            "map" => Ok(ValueKind::Map),
            other => Err(other.to_string()),
        }
    }
}

/// Value stored in a document tree node.
///
/// `Array` and `Map` carry no payload: their content lives in the child
/// nodes of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array,
    Map,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Array => ValueKind::Array,
            Value::Map => ValueKind::Map,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// String rendering of the value.
    ///
    /// Integers are base 10, floats use the shortest representation that
    /// round-trips, booleans are `true`/`false`. Containers render as `""`.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array | Value::Map => String::new(),
        }
    }

    /// Integer view of the value; `0` when the text does not parse.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(i) => *i,
            Value::String(s) => s.parse().unwrap_or(0),
            Value::Float(f) => *f as i64,
            Value::Bool(b) => i64::from(*b),
            Value::Array | Value::Map => 0,
        }
    }

    /// Float view of the value; `0.0` when the text does not parse.
    pub fn as_float(&self) -> f64 {
        match self {
            Value::Float(f) => *f,
            Value::Int(i) => *i as f64,
            Value::String(s) => s.parse().unwrap_or(0.0),
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Array | Value::Map => 0.0,
        }
    }

    /// Boolean view of the value; `false` when the text does not parse.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => s.parse().unwrap_or(false),
            Value::Array | Value::Map => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
