//! Time series samples

use serde::{Deserialize, Serialize};

use super::{read_pairs, settle, Decode, PREALLOC_LIMIT};
use crate::error::{Result, WireError};
use crate::reply::{ReplyReader, ReplyShape};

/// One sample: unix millisecond timestamp and value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TsTimestampValue {
    pub timestamp: i64,
    pub value: f64,
}

/// Latest sample (`TS.GET`); an empty series decodes as the default sample
impl Decode for TsTimestampValue {
    type Output = TsTimestampValue;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<TsTimestampValue> {
        let len = rd.read_map_len()?;
        let samples = read_pairs(rd, len, |rd| rd.expect_int(), |rd| rd.expect_float())?;

        Ok(samples
            .into_iter()
            .last()
            .map(|(timestamp, value)| TsTimestampValue { timestamp, value })
            .unwrap_or_default())
    }
}

/// Sample range (`TS.RANGE` / `TS.REVRANGE`), in reply order
pub struct TsTimestampValueSlice;

impl Decode for TsTimestampValueSlice {
    type Output = Vec<TsTimestampValue>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<Vec<TsTimestampValue>> {
        let len = rd.read_array_len()?;
        let mut samples = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        let mut failure = None;

        for _ in 0..len {
            if failure.is_some() {
                rd.skip()?;
                continue;
            }

            let pair_len = match rd.read_array_len() {
                Ok(pair_len) => pair_len,
                Err(e) => {
                    failure = Some(settle(rd, e)?);
                    continue;
                }
            };

            match read_sample(rd, pair_len) {
                Ok(sample) => samples.push(sample),
                Err(e) if e.is_stream_fatal() => return Err(e),
                Err(e) => failure = Some(e),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(samples),
        }
    }
}

/// Body of a `[timestamp, value]` array whose header is already read
///
/// Always consumes all `len` elements.
fn read_sample<R: ReplyReader + ?Sized>(rd: &mut R, len: usize) -> Result<TsTimestampValue> {
    let mut sample = TsTimestampValue::default();
    let mut failure = None;

    for i in 0..len {
        if failure.is_some() || i >= 2 {
            rd.skip()?;
            continue;
        }
        let outcome = if i == 0 {
            rd.expect_int().map(|timestamp| sample.timestamp = timestamp)
        } else {
            rd.expect_float().map(|value| sample.value = value)
        };
        if let Err(e) = outcome {
            failure = Some(settle(rd, e)?);
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }
    if len != 2 {
        return Err(WireError::Shape {
            expected: "[timestamp, value] pair",
            found: ReplyShape::Array,
        });
    }
    Ok(sample)
}
