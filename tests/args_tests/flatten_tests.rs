//! Flattener Tests
//!
//! Tests for expanding call-site arguments into a command tail.

use std::collections::{HashMap, HashSet};

use kvwire::args::{
    classify, ensure_count, ensure_pairs, flatten, flatten_onto, Arg, ArgClass, ArgTail, Token,
};
use kvwire::{impl_project, WireError};

struct AddOptions {
    retention: i64,
    labels: String,
    uncompressed: bool,
}

impl_project!(AddOptions {
    retention => "RETENTION,omitempty",
    labels => "LABELS,omitempty",
    uncompressed => "UNCOMPRESSED,omitempty",
});

fn pairs_of(tokens: &[Token]) -> HashSet<(String, String)> {
    tokens
        .chunks(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect()
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn test_classify_each_shape() {
    assert_eq!(classify(&Arg::from(7i64)), ArgClass::PassThrough);
    assert_eq!(classify(&Arg::from("text")), ArgClass::PassThrough);
    assert_eq!(classify(&Arg::from(vec!["a", "b"])), ArgClass::Sequence);
    assert_eq!(classify(&Arg::from(vec![Token::Int(1)])), ArgClass::Sequence);
    assert_eq!(
        classify(&Arg::from(HashMap::<String, String>::new())),
        ArgClass::Mapping
    );
    assert_eq!(
        classify(&Arg::optional_record::<AddOptions>(None)),
        ArgClass::Record
    );
}

// =============================================================================
// Flatten Tests
// =============================================================================

#[test]
fn test_flatten_scalars_in_order() {
    let tail = flatten(vec![Arg::from("field"), Arg::from(42i64), Arg::from(1.5f64)]).unwrap();

    assert_eq!(
        tail.to_tokens(),
        vec![
            Token::Text("field".into()),
            Token::Int(42),
            Token::Float(1.5)
        ]
    );
}

#[test]
fn test_flatten_empty() {
    let tail = flatten(Vec::new()).unwrap();
    assert!(tail.is_empty());
}

#[test]
fn test_flatten_mapping_sole_argument() {
    let mut map = HashMap::new();
    map.insert("a".to_string(), Token::Int(1));
    map.insert("b".to_string(), Token::Int(2));

    let tokens = flatten(vec![Arg::from(map)]).unwrap().to_tokens();

    assert_eq!(tokens.len(), 4);
    let expected: HashSet<_> = [("a", "1"), ("b", "2")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(pairs_of(&tokens), expected);
}

#[test]
fn test_flatten_mapping_after_scalar_keeps_pairs() {
    let mut map = HashMap::new();
    for i in 0..10 {
        map.insert(format!("k{}", i), format!("v{}", i));
    }

    let tokens = flatten(vec![Arg::from("head"), Arg::from(map)])
        .unwrap()
        .to_tokens();

    assert_eq!(tokens.len(), 21);
    assert_eq!(tokens[0], Token::Text("head".into()));
    let pairs = pairs_of(&tokens[1..]);
    assert_eq!(pairs.len(), 10);
    for i in 0..10 {
        assert!(pairs.contains(&(format!("k{}", i), format!("v{}", i))));
    }
}

#[test]
fn test_sequence_matches_positional_arguments() {
    let elements = vec![Token::Text("x".into()), Token::Int(3), Token::Float(0.25)];

    let as_sequence = flatten(vec![Arg::from(elements.clone())]).unwrap();
    let as_positional = flatten(elements.iter().cloned().map(Arg::from).collect()).unwrap();

    assert_eq!(as_sequence.to_tokens(), as_positional.to_tokens());
}

#[test]
fn test_fast_path_keeps_caller_vector() {
    let strings = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let ptr = strings.as_ptr();

    let tail = flatten(vec![Arg::from(strings)]).unwrap();

    match &tail {
        ArgTail::Strings(moved) => assert_eq!(moved.as_ptr(), ptr),
        other => panic!("Expected string tail, got {:?}", other),
    }
}

#[test]
fn test_fast_path_matches_copying_path() {
    let strings = vec!["a".to_string(), "b".to_string()];

    let fast = flatten(vec![Arg::from(strings.clone())]).unwrap();
    let copied = flatten_onto(Vec::new(), vec![Arg::from(strings), Arg::Seq(Vec::new())]).unwrap();

    assert!(matches!(fast, ArgTail::Strings(_)));
    assert!(matches!(copied, ArgTail::Tokens(_)));
    assert_eq!(fast.to_tokens(), copied.to_tokens());
}

#[test]
fn test_flatten_onto_existing_tokens() {
    let tail = flatten_onto(vec![Token::Text("LIMIT".into())], vec![Arg::from(vec!["0", "10"])])
        .unwrap();

    assert_eq!(
        tail.to_tokens(),
        vec![
            Token::Text("LIMIT".into()),
            Token::Text("0".into()),
            Token::Text("10".into())
        ]
    );
}

#[test]
fn test_wire_bytes_by_index() {
    let tail = flatten(vec![Arg::from(12i64), Arg::from("v")]).unwrap();

    assert_eq!(tail.wire_bytes(0), Some(b"12".to_vec()));
    assert_eq!(tail.wire_bytes(1), Some(b"v".to_vec()));
    assert_eq!(tail.wire_bytes(2), None);
}

// =============================================================================
// Record Argument Tests
// =============================================================================

#[test]
fn test_record_argument_projects_fields() {
    let options = AddOptions {
        retention: 1000,
        labels: String::new(),
        uncompressed: true,
    };

    let tokens = flatten(vec![Arg::record(&options)]).unwrap().to_tokens();

    assert_eq!(
        tokens,
        vec![
            Token::Text("RETENTION".into()),
            Token::Int(1000),
            Token::Text("UNCOMPRESSED".into()),
            Token::Int(1),
        ]
    );
}

#[test]
fn test_absent_optional_record_contributes_nothing() {
    let tail = flatten(vec![
        Arg::from("key"),
        Arg::optional_record::<AddOptions>(None),
        Arg::from("tail"),
    ])
    .unwrap();

    assert_eq!(
        tail.to_tokens(),
        vec![Token::Text("key".into()), Token::Text("tail".into())]
    );
}

#[test]
fn test_unbound_required_record_fails() {
    let result = flatten(vec![Arg::required_record::<AddOptions>(None)]);

    match result {
        Err(WireError::ArgumentShape(msg)) => assert!(msg.contains("AddOptions")),
        other => panic!("Expected ArgumentShape error, got {:?}", other),
    }
}

#[test]
fn test_bound_required_record_projects() {
    let options = AddOptions {
        retention: 0,
        labels: "sensor".to_string(),
        uncompressed: false,
    };

    let tokens = flatten(vec![Arg::required_record(Some(&options))])
        .unwrap()
        .to_tokens();

    assert_eq!(
        tokens,
        vec![Token::Text("LABELS".into()), Token::Text("sensor".into())]
    );
}

// =============================================================================
// Encode-time Check Tests
// =============================================================================

#[test]
fn test_ensure_pairs() {
    assert!(ensure_pairs(0, "HSET").is_ok());
    assert!(ensure_pairs(4, "HSET").is_ok());
    assert!(matches!(
        ensure_pairs(3, "HSET"),
        Err(WireError::ArgumentShape(_))
    ));
}

#[test]
fn test_ensure_count() {
    assert!(ensure_count(1, 1, 3, "ZADD").is_ok());
    assert!(ensure_count(3, 1, 3, "ZADD").is_ok());
    assert!(matches!(
        ensure_count(0, 1, 3, "ZADD"),
        Err(WireError::ArgumentShape(_))
    ));
    assert!(matches!(
        ensure_count(4, 1, 3, "ZADD"),
        Err(WireError::ArgumentShape(_))
    ));
}
