//! Reply Decoder Family
//!
//! One [`Decode`] implementation per result shape. Composite records decode
//! themselves (`Output = Self`); plain shapes use the marker types in
//! [`scalar`], [`slice`] and [`map`].
//!
//! ## Decode Flow
//! ```text
//! peek_shape ──► nil ─────► Ok(None)            (protocol nil)
//!            ├─► error ───► Err(Server)
//!            └─► other ───► D::decode ──► Ok(Some(value)) | Err(..)
//! ```
//!
//! A decoder that rejects the top-level shape outright leaves the reply in
//! place; `decode_reply` skips it before reporting the error.
//!
//! Decoders build their value locally and hand it back only when the whole
//! reply decoded, so a failure never leaves a half-filled result. After a
//! recoverable failure the remaining elements are still drained so the
//! stream stays aligned for the next reply.

pub mod json;
pub mod map;
pub mod probabilistic;
pub mod scalar;
pub mod slice;
pub mod timeseries;

use crate::error::{Result, WireError};
use crate::reply::{ReplyReader, ReplyShape, Value, PREALLOC_LIMIT};

pub use json::{JsonReply, JsonSliceReply, JsonValue};
pub use map::{MapStringIntReply, MapStringStringReply};
pub use probabilistic::{BfInfo, CfInfo, CmsInfo, ScanDump, TDigestInfo, TopKInfo};
pub use scalar::{BoolReply, BytesReply, FloatReply, IntReply, StatusReply, StringReply, ValueReply};
pub use slice::{
    for_each_string, BoolSliceReply, FloatSliceReply, IntSliceReply, NullableIntSliceReply,
    NullableStringSliceReply, StringSliceReply,
};
pub use timeseries::{TsTimestampValue, TsTimestampValueSlice};

/// A decoder for one result shape
pub trait Decode {
    type Output;

    /// Decode a reply already known to be neither nil nor an error
    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Self::Output>;
}

/// Decode one top-level reply with `D`
///
/// Returns `Ok(None)` when the server replied with a protocol nil.
pub fn decode_reply<D, R>(rd: &mut R) -> Result<Option<D::Output>>
where
    D: Decode,
    R: ReplyReader + ?Sized,
{
    match rd.peek_shape()? {
        ReplyShape::Nil => {
            rd.read_nil()?;
            Ok(None)
        }
        ReplyShape::Error => match rd.read_value()? {
            Value::Error(message) => Err(WireError::Server(message)),
            other => Err(WireError::Protocol(format!(
                "Expected error reply, got {}",
                other.shape()
            ))),
        },
        _ => {
            let before = rd.headers_read();
            match D::decode(rd) {
                Ok(value) => Ok(Some(value)),
                // The decoder rejected the reply without touching it
                Err(err) if err.left_unread() && rd.headers_read() == before => {
                    Err(settle(rd, err)?)
                }
                Err(err) => Err(err),
            }
        }
    }
}

// =============================================================================
// Draining Helpers
// =============================================================================

/// Keep the stream aligned after a failed read; hand back the error to report
pub(crate) fn settle<R: ReplyReader + ?Sized>(rd: &mut R, err: WireError) -> Result<WireError> {
    if err.is_stream_fatal() {
        return Err(err);
    }
    if err.left_unread() {
        rd.skip()?;
    }
    Ok(err)
}

/// Read exactly `len` elements with `read`
///
/// On the first recoverable failure the rest of the elements are skipped
/// and that failure is returned.
pub(crate) fn read_elements<R, T, F>(rd: &mut R, len: usize, mut read: F) -> Result<Vec<T>>
where
    R: ReplyReader + ?Sized,
    F: FnMut(&mut R) -> Result<T>,
{
    let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    let mut failure = None;

    for _ in 0..len {
        if failure.is_some() {
            rd.skip()?;
            continue;
        }
        match read(rd) {
            Ok(item) => items.push(item),
            Err(e) => failure = Some(settle(rd, e)?),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(items),
    }
}

/// Read exactly `len` key/value pairs, each key and value being one reply
///
/// Drains the remaining pairs after the first recoverable failure, like
/// [`read_elements`].
pub(crate) fn read_pairs<R, K, V, FK, FV>(
    rd: &mut R,
    len: usize,
    mut read_key: FK,
    mut read_value: FV,
) -> Result<Vec<(K, V)>>
where
    R: ReplyReader + ?Sized,
    FK: FnMut(&mut R) -> Result<K>,
    FV: FnMut(&mut R) -> Result<V>,
{
    let mut pairs = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    let mut failure = None;

    for _ in 0..len {
        if failure.is_some() {
            rd.skip()?;
            rd.skip()?;
            continue;
        }

        let key = match read_key(rd) {
            Ok(key) => key,
            Err(e) => {
                failure = Some(settle(rd, e)?);
                rd.skip()?;
                continue;
            }
        };

        match read_value(rd) {
            Ok(value) => pairs.push((key, value)),
            Err(e) => failure = Some(settle(rd, e)?),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(pairs),
    }
}

/// Read a string-keyed map reply, handing each key to `field`
///
/// `field` reads the value and returns `Ok(false)` for a key it does not
/// know. Unknown keys fail the decode with [`WireError::UnrecognizedField`]
/// once the whole map has been consumed.
pub(crate) fn read_fields<R, F>(rd: &mut R, context: &'static str, mut field: F) -> Result<()>
where
    R: ReplyReader + ?Sized,
    F: FnMut(&str, &mut R) -> Result<bool>,
{
    let len = rd.read_map_len()?;
    let mut failure = None;

    for _ in 0..len {
        if failure.is_some() {
            rd.skip()?;
            rd.skip()?;
            continue;
        }

        let key = match rd.expect_string() {
            Ok(key) => key,
            Err(e) => {
                failure = Some(settle(rd, e)?);
                rd.skip()?;
                continue;
            }
        };

        match field(&key, rd) {
            Ok(true) => {}
            Ok(false) => {
                rd.skip()?;
                failure = Some(WireError::UnrecognizedField { context, key });
            }
            Err(e) => failure = Some(settle(rd, e)?),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
