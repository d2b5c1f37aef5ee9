//! Composite Record Decoder Tests
//!
//! Tests for info blocks, dump chunks, time series samples, and JSON replies.

use kvwire::decode::{
    decode_reply, BfInfo, CfInfo, CmsInfo, JsonReply, JsonSliceReply, JsonValue, ScanDump,
    TDigestInfo, TopKInfo, TsTimestampValue, TsTimestampValueSlice,
};
use kvwire::{ReplyReader, Value, WireError};

use crate::common::{decode, reader};

const BF_INFO: &str = "%5\r\n\
    +Capacity\r\n:100\r\n\
    +Size\r\n:200\r\n\
    +Number of filters\r\n:3\r\n\
    +Number of items inserted\r\n:50\r\n\
    +Expansion rate\r\n:2\r\n";

// =============================================================================
// Filter Info Tests
// =============================================================================

#[test]
fn test_bf_info() {
    let info = decode::<BfInfo>(BF_INFO).unwrap().unwrap();

    assert_eq!(
        info,
        BfInfo {
            capacity: 100,
            size: 200,
            filters: 3,
            items_inserted: 50,
            expansion_rate: 2,
        }
    );
}

#[test]
fn test_bf_info_as_flat_array() {
    let wire = "*10\r\n\
        +Capacity\r\n:100\r\n\
        +Size\r\n:200\r\n\
        +Number of filters\r\n:3\r\n\
        +Number of items inserted\r\n:50\r\n\
        +Expansion rate\r\n:2\r\n";

    let info = decode::<BfInfo>(wire).unwrap().unwrap();
    assert_eq!(info.capacity, 100);
    assert_eq!(info.expansion_rate, 2);
}

#[test]
fn test_bf_info_unknown_key() {
    let wire = "%6\r\n\
        +Capacity\r\n:100\r\n\
        +Size\r\n:200\r\n\
        +Foo\r\n:1\r\n\
        +Number of filters\r\n:3\r\n\
        +Number of items inserted\r\n:50\r\n\
        +Expansion rate\r\n:2\r\n\
        +NEXT\r\n";
    let mut rd = reader(wire);

    match decode_reply::<BfInfo, _>(&mut rd) {
        Err(WireError::UnrecognizedField { context, key }) => {
            assert_eq!(context, "BF.INFO");
            assert_eq!(key, "Foo");
        }
        other => panic!("Expected UnrecognizedField, got {:?}", other),
    }
    assert_eq!(rd.read_string().unwrap(), Some("NEXT".to_string()));
}

#[test]
fn test_cf_info() {
    let wire = "%8\r\n\
        +Size\r\n:1080\r\n\
        +Number of buckets\r\n:512\r\n\
        +Number of filters\r\n:1\r\n\
        +Number of items inserted\r\n:3\r\n\
        +Number of items deleted\r\n:1\r\n\
        +Bucket size\r\n:2\r\n\
        +Expansion rate\r\n:1\r\n\
        +Max iterations\r\n:20\r\n";

    let info = decode::<CfInfo>(wire).unwrap().unwrap();

    assert_eq!(info.size, 1080);
    assert_eq!(info.num_buckets, 512);
    assert_eq!(info.num_items_deleted, 1);
    assert_eq!(info.max_iteration, 20);
}

// =============================================================================
// Sketch Info Tests
// =============================================================================

#[test]
fn test_cms_info() {
    let wire = "*6\r\n+width\r\n:2000\r\n+depth\r\n:7\r\n+count\r\n:42\r\n";

    let info = decode::<CmsInfo>(wire).unwrap().unwrap();

    assert_eq!(
        info,
        CmsInfo {
            width: 2000,
            depth: 7,
            count: 42
        }
    );
}

#[test]
fn test_topk_info_decay_as_text() {
    let wire = "%4\r\n+k\r\n:10\r\n+width\r\n:50\r\n+depth\r\n:5\r\n+decay\r\n$3\r\n0.9\r\n";

    let info = decode::<TopKInfo>(wire).unwrap().unwrap();

    assert_eq!(info.k, 10);
    assert_eq!(info.decay, 0.9);
}

#[test]
fn test_topk_info_bad_decay() {
    let wire = "%2\r\n+k\r\n:10\r\n+decay\r\n$4\r\nfast\r\n";

    assert!(matches!(
        decode::<TopKInfo>(wire),
        Err(WireError::ScalarParse { .. })
    ));
}

#[test]
fn test_tdigest_info() {
    let wire = "%9\r\n\
        +Compression\r\n:100\r\n\
        +Capacity\r\n:610\r\n\
        +Merged nodes\r\n:0\r\n\
        +Unmerged nodes\r\n:3\r\n\
        +Merged weight\r\n:0\r\n\
        +Unmerged weight\r\n:3\r\n\
        +Observations\r\n:3\r\n\
        +Total compressions\r\n:0\r\n\
        +Memory usage\r\n:9768\r\n";

    let info = decode::<TDigestInfo>(wire).unwrap().unwrap();

    assert_eq!(info.compression, 100);
    assert_eq!(info.unmerged_nodes, 3);
    assert_eq!(info.memory_usage, 9768);
}

// =============================================================================
// Dump Tests
// =============================================================================

#[test]
fn test_scan_dump_chunk() {
    let dump = decode::<ScanDump>("*2\r\n:1\r\n$4\r\n\x00\x01\x02\x03\r\n")
        .unwrap()
        .unwrap();

    assert_eq!(dump.iter, 1);
    assert_eq!(&dump.data[..], &[0, 1, 2, 3]);
}

#[test]
fn test_scan_dump_end() {
    let dump = decode::<ScanDump>("*2\r\n:0\r\n$-1\r\n").unwrap().unwrap();

    assert_eq!(dump, ScanDump::default());
}

// =============================================================================
// Time Series Tests
// =============================================================================

#[test]
fn test_ts_get_sample() {
    let sample = decode::<TsTimestampValue>("*2\r\n:1700000000000\r\n$4\r\n26.5\r\n")
        .unwrap()
        .unwrap();

    assert_eq!(
        sample,
        TsTimestampValue {
            timestamp: 1_700_000_000_000,
            value: 26.5
        }
    );
}

#[test]
fn test_ts_get_empty_series() {
    let sample = decode::<TsTimestampValue>("*0\r\n").unwrap().unwrap();
    assert_eq!(sample, TsTimestampValue::default());
}

#[test]
fn test_ts_range() {
    let wire = "*2\r\n*2\r\n:1000\r\n+1.5\r\n*2\r\n:2000\r\n,2.5\r\n";

    let samples = decode::<TsTimestampValueSlice>(wire).unwrap().unwrap();

    assert_eq!(
        samples,
        vec![
            TsTimestampValue {
                timestamp: 1000,
                value: 1.5
            },
            TsTimestampValue {
                timestamp: 2000,
                value: 2.5
            },
        ]
    );
}

#[test]
fn test_ts_range_malformed_sample_keeps_alignment() {
    let wire = "*2\r\n*3\r\n:1\r\n+1\r\n+extra\r\n*2\r\n:2\r\n+2\r\n:5\r\n";
    let mut rd = reader(wire);

    assert!(matches!(
        decode_reply::<TsTimestampValueSlice, _>(&mut rd),
        Err(WireError::Shape { .. })
    ));
    assert_eq!(rd.read_int().unwrap(), Some(5));
}

// =============================================================================
// JSON Tests
// =============================================================================

#[test]
fn test_json_text() {
    let doc = decode::<JsonReply>("$13\r\n{\"a\":[1,2,3]}\r\n")
        .unwrap()
        .unwrap();
    assert_eq!(doc.as_text(), Some("{\"a\":[1,2,3]}"));
}

#[test]
fn test_json_expanded() {
    let doc = decode::<JsonReply>("*2\r\n:1\r\n+two\r\n").unwrap().unwrap();

    assert_eq!(
        doc,
        JsonValue::Expanded(vec![Value::Int(1), Value::Text("two".into())])
    );
    assert_eq!(doc.as_text(), None);
}

#[test]
fn test_json_nil_is_none() {
    assert_eq!(decode::<JsonReply>("$-1\r\n").unwrap(), None);
}

#[test]
fn test_json_slice() {
    let values = decode::<JsonSliceReply>("*2\r\n$7\r\n[\"one\"]\r\n$-1\r\n")
        .unwrap()
        .unwrap();

    assert_eq!(values, vec![Value::Text("[\"one\"]".into()), Value::Nil]);
}

#[test]
fn test_json_slice_rejects_scalar() {
    assert!(matches!(
        decode::<JsonSliceReply>("+OK\r\n"),
        Err(WireError::Shape { .. })
    ));
}
