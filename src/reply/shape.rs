//! Reply shapes and generic reply values

use std::fmt;

use bytes::Bytes;

use crate::args::format_float;

/// Structural tag of the next reply, discovered before it is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// Array, set or push
    Array,
    Map,
    /// Simple, bulk, verbatim string or big number
    String,
    Integer,
    Float,
    Bool,
    Nil,
    Error,
}

impl fmt::Display for ReplyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyShape::Array => "array",
            ReplyShape::Map => "map",
            ReplyShape::String => "string",
            ReplyShape::Integer => "integer",
            ReplyShape::Float => "float",
            ReplyShape::Bool => "bool",
            ReplyShape::Nil => "nil",
            ReplyShape::Error => "error",
        };
        f.write_str(name)
    }
}

/// A reply decoded without a target type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Bulk string that is not valid UTF-8
    Bytes(Bytes),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// Error reply nested inside an aggregate
    Error(String),
}

impl Value {
    pub fn shape(&self) -> ReplyShape {
        match self {
            Value::Nil => ReplyShape::Nil,
            Value::Int(_) => ReplyShape::Integer,
            Value::Float(_) => ReplyShape::Float,
            Value::Bool(_) => ReplyShape::Bool,
            Value::Text(_) | Value::Bytes(_) => ReplyShape::String,
            Value::Array(_) => ReplyShape::Array,
            Value::Map(_) => ReplyShape::Map,
            Value::Error(_) => ReplyShape::Error,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("(nil)"),
            Value::Int(n) => write!(f, "(integer) {}", n),
            Value::Float(x) => write!(f, "(double) {}", format_float(*x)),
            Value::Bool(b) => write!(f, "({})", b),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "{:?}", b),
            Value::Error(e) => write!(f, "(error) {}", e),
            Value::Array(items) => {
                if items.is_empty() {
                    return f.write_str("(empty array)");
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
            Value::Map(pairs) => {
                if pairs.is_empty() {
                    return f.write_str("(empty map)");
                }
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}# {} => {}", i + 1, key, value)?;
                }
                Ok(())
            }
        }
    }
}
