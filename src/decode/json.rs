//! JSON document replies
//!
//! `JSON.GET` answers with a single serialized document in one server mode
//! and with an array of already-decoded values in another, so these
//! decoders peek the shape once and commit to exactly one parse path.

use super::{read_elements, Decode};
use crate::error::{Result, WireError};
use crate::reply::{ReplyReader, ReplyShape, Value};

/// Result of a JSON read
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// Serialized JSON text (empty when the server sent nil)
    Text(String),

    /// Values the server already expanded
    Expanded(Vec<Value>),
}

impl JsonValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            JsonValue::Text(text) => Some(text),
            JsonValue::Expanded(_) => None,
        }
    }
}

/// Single JSON result: serialized text or an expanded array
pub struct JsonReply;

impl Decode for JsonReply {
    type Output = JsonValue;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<JsonValue> {
        if rd.peek_shape()? == ReplyShape::Array {
            let len = rd.read_array_len()?;
            let values = read_elements(rd, len, |rd| rd.read_value())?;
            return Ok(JsonValue::Expanded(values));
        }

        let text = rd.read_string()?.unwrap_or_default();
        Ok(JsonValue::Text(text))
    }
}

/// Multi-key JSON result (`JSON.MGET`, `JSON.TYPE`)
///
/// Elements are either serialized text (nil for a missing key) or nested
/// arrays; both come back as generic values.
pub struct JsonSliceReply;

impl Decode for JsonSliceReply {
    type Output = Vec<Value>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<Value>> {
        let shape = rd.peek_shape()?;
        if shape != ReplyShape::Array {
            return Err(WireError::Shape {
                expected: "array",
                found: shape,
            });
        }
        let len = rd.read_array_len()?;
        read_elements(rd, len, |rd| rd.read_value())
    }
}
