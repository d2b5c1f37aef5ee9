//! Probabilistic structure info records
//!
//! Each record is filled from a string-keyed map reply by switching on the
//! exact key text. Any key the record does not know fails the decode with
//! `UnrecognizedField`, so client/server version skew surfaces early.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{read_fields, read_pairs, Decode};
use crate::error::Result;
use crate::reply::ReplyReader;

/// Bloom filter info (`BF.INFO`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfInfo {
    pub capacity: i64,
    pub size: i64,
    pub filters: i64,
    pub items_inserted: i64,
    pub expansion_rate: i64,
}

impl Decode for BfInfo {
    type Output = BfInfo;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<BfInfo> {
        let mut info = BfInfo::default();
        read_fields(rd, "BF.INFO", |key, rd| {
            match key {
                "Capacity" => info.capacity = rd.expect_int()?,
                "Size" => info.size = rd.expect_int()?,
                "Number of filters" => info.filters = rd.expect_int()?,
                "Number of items inserted" => info.items_inserted = rd.expect_int()?,
                "Expansion rate" => info.expansion_rate = rd.expect_int()?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(info)
    }
}

/// Cuckoo filter info (`CF.INFO`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfInfo {
    pub size: i64,
    pub num_buckets: i64,
    pub num_filters: i64,
    pub num_items_inserted: i64,
    pub num_items_deleted: i64,
    pub bucket_size: i64,
    pub expansion_rate: i64,
    pub max_iteration: i64,
}

impl Decode for CfInfo {
    type Output = CfInfo;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<CfInfo> {
        let mut info = CfInfo::default();
        read_fields(rd, "CF.INFO", |key, rd| {
            match key {
                "Size" => info.size = rd.expect_int()?,
                "Number of buckets" => info.num_buckets = rd.expect_int()?,
                "Number of filters" => info.num_filters = rd.expect_int()?,
                "Number of items inserted" => info.num_items_inserted = rd.expect_int()?,
                "Number of items deleted" => info.num_items_deleted = rd.expect_int()?,
                "Bucket size" => info.bucket_size = rd.expect_int()?,
                "Expansion rate" => info.expansion_rate = rd.expect_int()?,
                "Max iterations" => info.max_iteration = rd.expect_int()?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(info)
    }
}

/// Count-Min Sketch info (`CMS.INFO`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsInfo {
    pub width: i64,
    pub depth: i64,
    pub count: i64,
}

impl Decode for CmsInfo {
    type Output = CmsInfo;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<CmsInfo> {
        let mut info = CmsInfo::default();
        read_fields(rd, "CMS.INFO", |key, rd| {
            match key {
                "width" => info.width = rd.expect_int()?,
                "depth" => info.depth = rd.expect_int()?,
                "count" => info.count = rd.expect_int()?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(info)
    }
}

/// Top-K info (`TOPK.INFO`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TopKInfo {
    pub k: i64,
    pub width: i64,
    pub depth: i64,
    pub decay: f64,
}

impl Decode for TopKInfo {
    type Output = TopKInfo;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<TopKInfo> {
        let mut info = TopKInfo::default();
        read_fields(rd, "TOPK.INFO", |key, rd| {
            match key {
                "k" => info.k = rd.expect_int()?,
                "width" => info.width = rd.expect_int()?,
                "depth" => info.depth = rd.expect_int()?,
                "decay" => info.decay = rd.expect_float()?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(info)
    }
}

/// t-digest info (`TDIGEST.INFO`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TDigestInfo {
    pub compression: i64,
    pub capacity: i64,
    pub merged_nodes: i64,
    pub unmerged_nodes: i64,
    pub merged_weight: i64,
    pub unmerged_weight: i64,
    pub observations: i64,
    pub total_compressions: i64,
    pub memory_usage: i64,
}

impl Decode for TDigestInfo {
    type Output = TDigestInfo;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<TDigestInfo> {
        let mut info = TDigestInfo::default();
        read_fields(rd, "TDIGEST.INFO", |key, rd| {
            match key {
                "Compression" => info.compression = rd.expect_int()?,
                "Capacity" => info.capacity = rd.expect_int()?,
                "Merged nodes" => info.merged_nodes = rd.expect_int()?,
                "Unmerged nodes" => info.unmerged_nodes = rd.expect_int()?,
                "Merged weight" => info.merged_weight = rd.expect_int()?,
                "Unmerged weight" => info.unmerged_weight = rd.expect_int()?,
                "Observations" => info.observations = rd.expect_int()?,
                "Total compressions" => info.total_compressions = rd.expect_int()?,
                "Memory usage" => info.memory_usage = rd.expect_int()?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(info)
    }
}

/// One chunk of an incremental filter dump (`BF.SCANDUMP` / `CF.SCANDUMP`)
///
/// An `iter` of 0 marks the end of the dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanDump {
    pub iter: i64,
    pub data: Bytes,
}

impl Decode for ScanDump {
    type Output = ScanDump;

    fn decode<R: ReplyReader + ?Sized>(rd: &mut R) -> Result<ScanDump> {
        let len = rd.read_map_len()?;
        let chunks = read_pairs(
            rd,
            len,
            |rd| rd.expect_int(),
            |rd| {
                let mut buf = Vec::new();
                rd.read_string_into(&mut buf)?;
                Ok(Bytes::from(buf))
            },
        )?;

        Ok(chunks
            .into_iter()
            .last()
            .map(|(iter, data)| ScanDump { iter, data })
            .unwrap_or_default())
    }
}
