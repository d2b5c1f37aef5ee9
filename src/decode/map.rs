//! String-keyed mapping decoders
//!
//! Accept a native map (RESP3) as well as a flat key/value array (RESP2).
//! A repeated key keeps its last value.

use std::collections::HashMap;

use super::{read_pairs, Decode};
use crate::error::Result;
use crate::reply::ReplyReader;

/// Map of text to text
pub struct MapStringStringReply;

impl Decode for MapStringStringReply {
    type Output = HashMap<String, String>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<HashMap<String, String>> {
        let len = rd.read_map_len()?;
        let pairs = read_pairs(rd, len, |rd| rd.expect_string(), |rd| rd.expect_string())?;
        Ok(pairs.into_iter().collect())
    }
}

/// Map of text to integer
pub struct MapStringIntReply;

impl Decode for MapStringIntReply {
    type Output = HashMap<String, i64>;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<HashMap<String, i64>> {
        let len = rd.read_map_len()?;
        let pairs = read_pairs(rd, len, |rd| rd.expect_string(), |rd| rd.expect_int())?;
        Ok(pairs.into_iter().collect())
    }
}
