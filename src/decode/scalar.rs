//! Scalar decoders

use bytes::Bytes;

use super::Decode;
use crate::error::Result;
use crate::reply::{ReplyReader, Value};

/// Status reply such as `+OK`
pub struct StatusReply;

impl Decode for StatusReply {
    type Output = String;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<String> {
        rd.expect_string()
    }
}

/// Text reply
pub struct StringReply;

impl Decode for StringReply {
    type Output = String;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<String> {
        rd.expect_string()
    }
}

/// Binary-safe string reply
pub struct BytesReply;

impl Decode for BytesReply {
    type Output = Bytes;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Bytes> {
        let mut buf = Vec::new();
        rd.refuse_nil("string")?;
        rd.read_string_into(&mut buf)?;
        Ok(Bytes::from(buf))
    }
}

/// Integer reply
pub struct IntReply;

impl Decode for IntReply {
    type Output = i64;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<i64> {
        rd.expect_int()
    }
}

/// Float reply; text that is not a number fails with `ScalarParse`
pub struct FloatReply;

impl Decode for FloatReply {
    type Output = f64;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<f64> {
        rd.expect_float()
    }
}

/// Boolean reply (`#t`, `:1`, `+OK`)
pub struct BoolReply;

impl Decode for BoolReply {
    type Output = bool;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<bool> {
        rd.refuse_nil("bool")?;
        Ok(rd.read_bool()?.unwrap_or(false))
    }
}

/// Any reply, as a generic value
pub struct ValueReply;

impl Decode for ValueReply {
    type Output = Value;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Value> {
        rd.read_value()
    }
}
