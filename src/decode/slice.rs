//! Sequence decoders
//!
//! Homogeneous sequences are strict: every element must be present and of
//! the expected kind. The nullable variants keep a per-element
//! present/absent state instead.

use super::{read_elements, settle, Decode};
use crate::error::Result;
use crate::reply::ReplyReader;

/// Array of text
pub struct StringSliceReply;

impl Decode for StringSliceReply {
    type Output = Vec<String>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<String>> {
        let len = rd.read_array_len()?;
        read_elements(rd, len, |rd| rd.expect_string())
    }
}

/// Array of integers
pub struct IntSliceReply;

impl Decode for IntSliceReply {
    type Output = Vec<i64>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<i64>> {
        let len = rd.read_array_len()?;
        read_elements(rd, len, |rd| rd.expect_int())
    }
}

/// Array of floats, numeric text included
pub struct FloatSliceReply;

impl Decode for FloatSliceReply {
    type Output = Vec<f64>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<f64>> {
        let len = rd.read_array_len()?;
        read_elements(rd, len, |rd| rd.expect_float())
    }
}

/// Array of booleans
pub struct BoolSliceReply;

impl Decode for BoolSliceReply {
    type Output = Vec<bool>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<bool>> {
        let len = rd.read_array_len()?;
        read_elements(rd, len, |rd| {
            rd.refuse_nil("bool")?;
            Ok(rd.read_bool()?.unwrap_or(false))
        })
    }
}

/// Array of integers where any element may be nil
pub struct NullableIntSliceReply;

impl Decode for NullableIntSliceReply {
    type Output = Vec<Option<i64>>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<Option<i64>>> {
        let len = rd.read_array_len()?;
        read_elements(rd, len, |rd| rd.read_int())
    }
}

/// Array of text where any element may be nil
pub struct NullableStringSliceReply;

impl Decode for NullableStringSliceReply {
    type Output = Vec<Option<String>>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<Option<String>>> {
        let len = rd.read_array_len()?;
        read_elements(rd, len, |rd| rd.read_string())
    }
}

/// Visit every element of a string array through one reusable buffer
///
/// Nil elements are visited as `None`. Returns the element count. Nothing
/// but the current element is held in memory, so arbitrarily large replies
/// can be consumed.
pub fn for_each_string<R, F>(rd: &mut R, mut visit: F) -> Result<usize>
where
    R: ReplyReader + ?Sized,
    F: FnMut(Option<&[u8]>) -> Result<()>,
{
    let len = match rd.read_array_len() {
        Ok(len) => len,
        Err(e) => return Err(settle(rd, e)?),
    };
    let mut buf = Vec::new();
    let mut failure = None;

    for _ in 0..len {
        if failure.is_some() {
            rd.skip()?;
            continue;
        }
        let outcome = match rd.read_string_into(&mut buf) {
            Ok(true) => visit(Some(buf.as_slice())),
            Ok(false) => visit(None),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            failure = Some(settle(rd, e)?);
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(len),
    }
}
