//! Record Round Trip Tests
//!
//! A record projected into command tokens, served back as a map reply, and
//! read by the matching composite decoder keeps every emitted field.

use kvwire::args::{project_into, Token};
use kvwire::decode::BfInfo;
use kvwire::impl_project;

use crate::common::decode;

/// Same field names `BF.INFO` reports
struct BloomStats {
    capacity: i64,
    size: i64,
    filters: i64,
    items_inserted: i64,
    expansion_rate: i64,
}

impl_project!(BloomStats {
    capacity => "Capacity",
    size => "Size",
    filters => "Number of filters",
    items_inserted => "Number of items inserted",
    expansion_rate => "Expansion rate,omitempty",
});

/// Serve name/value tokens back as a RESP3 map of bulk strings
fn as_map_reply(tokens: &[Token]) -> String {
    let mut wire = format!("%{}\r\n", tokens.len() / 2);
    for token in tokens {
        let mut bytes = Vec::new();
        token.append_wire_bytes(&mut bytes);
        wire.push_str(&format!("${}\r\n", bytes.len()));
        wire.push_str(&String::from_utf8(bytes).unwrap());
        wire.push_str("\r\n");
    }
    wire
}

fn tokens_of(stats: &BloomStats) -> Vec<Token> {
    let mut tokens = Vec::new();
    project_into(stats, &mut tokens);
    tokens
}

#[test]
fn test_every_field_survives() {
    let stats = BloomStats {
        capacity: 1000,
        size: 1432,
        filters: 1,
        items_inserted: 17,
        expansion_rate: 4,
    };

    let tokens = tokens_of(&stats);
    assert_eq!(tokens.len(), 10);

    let info = decode::<BfInfo>(&as_map_reply(&tokens)).unwrap().unwrap();
    assert_eq!(
        info,
        BfInfo {
            capacity: 1000,
            size: 1432,
            filters: 1,
            items_inserted: 17,
            expansion_rate: 4,
        }
    );
}

#[test]
fn test_omitted_zero_field_is_absent() {
    let stats = BloomStats {
        capacity: 1000,
        size: 1432,
        filters: 1,
        items_inserted: 0,
        expansion_rate: 0,
    };

    let tokens = tokens_of(&stats);
    assert_eq!(tokens.len(), 8);
    assert!(!tokens.contains(&Token::Text("Expansion rate".into())));

    // Zero without omitempty is still sent
    assert!(tokens.contains(&Token::Text("Number of items inserted".into())));

    let wire = as_map_reply(&tokens);
    assert!(wire.starts_with("%4\r\n"));

    let info = decode::<BfInfo>(&wire).unwrap().unwrap();
    assert_eq!(info.capacity, 1000);
    assert_eq!(info.size, 1432);
    assert_eq!(info.filters, 1);
    assert_eq!(info.items_inserted, 0);
    assert_eq!(info.expansion_rate, 0);
}
