//! Reply reader primitives
//!
//! The decoders only ever talk to a reply stream through [`ReplyReader`].
//!
//! ## Consumption Contract
//! - `peek_shape` never consumes.
//! - A primitive that finds the wrong shape returns [`WireError::Shape`]
//!   and leaves the reply unread, so the caller can `skip` it.
//! - A primitive that finds an error reply consumes it and returns
//!   [`WireError::Server`].
//! - Every other outcome, including [`WireError::ScalarParse`], consumes
//!   exactly one reply.

use super::{ReplyShape, Value};
use crate::error::{Result, WireError};

/// Primitive operations over one in-flight reply stream
///
/// Not reentrant: one decode at a time per reader.
pub trait ReplyReader {
    /// Shape of the next reply, without consuming it
    fn peek_shape(&mut self) -> Result<ReplyShape>;

    /// Element count of an array reply
    fn read_array_len(&mut self) -> Result<usize>;

    /// Pair count of a map reply (a flat array of even length also counts)
    fn read_map_len(&mut self) -> Result<usize>;

    /// Integer scalar; `None` on protocol nil
    fn read_int(&mut self) -> Result<Option<i64>>;

    /// Float scalar, parsing text replies; `None` on protocol nil
    fn read_float(&mut self) -> Result<Option<f64>>;

    /// Text scalar; `None` on protocol nil
    fn read_string(&mut self) -> Result<Option<String>>;

    /// Text scalar written into a reusable buffer; `false` on protocol nil
    fn read_string_into(&mut self, buf: &mut Vec<u8>) -> Result<bool>;

    /// Boolean scalar (`#t`, `:1`, `+OK`); `None` on protocol nil
    fn read_bool(&mut self) -> Result<Option<bool>>;

    /// Any reply, fully decoded
    fn read_value(&mut self) -> Result<Value>;

    /// Discard one complete reply
    fn skip(&mut self) -> Result<()>;

    /// Number of reply headers consumed so far, nested ones included
    ///
    /// Unchanged across a call means that call left the stream untouched.
    fn headers_read(&self) -> u64;

    // =========================================================================
    // Provided helpers
    // =========================================================================

    /// Consume a protocol nil
    fn read_nil(&mut self) -> Result<()> {
        let shape = self.peek_shape()?;
        if shape != ReplyShape::Nil {
            return Err(WireError::Shape {
                expected: "nil",
                found: shape,
            });
        }
        self.skip()
    }

    /// Integer that must be present
    fn expect_int(&mut self) -> Result<i64> {
        self.refuse_nil("integer")?;
        self.read_int()?.ok_or(WireError::Shape {
            expected: "integer",
            found: ReplyShape::Nil,
        })
    }

    /// Float that must be present
    fn expect_float(&mut self) -> Result<f64> {
        self.refuse_nil("float")?;
        self.read_float()?.ok_or(WireError::Shape {
            expected: "float",
            found: ReplyShape::Nil,
        })
    }

    /// Text that must be present
    fn expect_string(&mut self) -> Result<String> {
        self.refuse_nil("string")?;
        self.read_string()?.ok_or(WireError::Shape {
            expected: "string",
            found: ReplyShape::Nil,
        })
    }

    /// Fails, without consuming, when the next reply is nil
    fn refuse_nil(&mut self, expected: &'static str) -> Result<()> {
        if self.peek_shape()? == ReplyShape::Nil {
            return Err(WireError::Shape {
                expected,
                found: ReplyShape::Nil,
            });
        }
        Ok(())
    }
}

impl<R: ReplyReader + ?Sized> ReplyReader for &mut R {
    fn peek_shape(&mut self) -> Result<ReplyShape> {
        (**self).peek_shape()
    }

    fn read_array_len(&mut self) -> Result<usize> {
        (**self).read_array_len()
    }

    fn read_map_len(&mut self) -> Result<usize> {
        (**self).read_map_len()
    }

    fn read_int(&mut self) -> Result<Option<i64>> {
        (**self).read_int()
    }

    fn read_float(&mut self) -> Result<Option<f64>> {
        (**self).read_float()
    }

    fn read_string(&mut self) -> Result<Option<String>> {
        (**self).read_string()
    }

    fn read_string_into(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        (**self).read_string_into(buf)
    }

    fn read_bool(&mut self) -> Result<Option<bool>> {
        (**self).read_bool()
    }

    fn read_value(&mut self) -> Result<Value> {
        (**self).read_value()
    }

    fn skip(&mut self) -> Result<()> {
        (**self).skip()
    }

    fn headers_read(&self) -> u64 {
        (**self).headers_read()
    }
}
