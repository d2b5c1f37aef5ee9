//! Command/Result Handle Tests
//!
//! Tests for the one-shot decode lifecycle and encode-time failures.

use std::io::{self, BufRead, Cursor, Read};

use kvwire::args::{ensure_pairs, Validate};
use kvwire::decode::{
    BfInfo, FloatSliceReply, IntReply, JsonReply, StatusReply, StringReply, ValueReply,
};
use kvwire::protocol::{Cmd, DecodedResult};
use kvwire::{Arg, ReplyReader, RespReader, WireError};

fn reader(wire: &str) -> RespReader<Cursor<Vec<u8>>> {
    RespReader::new(Cursor::new(wire.as_bytes().to_vec()))
}

struct RangeOptions {
    by_score: bool,
    by_lex: bool,
}

impl Validate for RangeOptions {
    fn validate(&self) -> kvwire::Result<()> {
        if self.by_score && self.by_lex {
            return Err(WireError::Validation(
                "BYSCORE and BYLEX are mutually exclusive".into(),
            ));
        }
        Ok(())
    }
}

/// A stream whose reads time out, like a socket past its deadline
struct TimedOut;

impl Read for TimedOut {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "deadline"))
    }
}

impl BufRead for TimedOut {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "deadline"))
    }

    fn consume(&mut self, _amt: usize) {}
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_new_handle_is_pending() {
    let cmd: Cmd<IntReply> = Cmd::with_key("INCR", "n", vec![]);

    assert!(cmd.is_sendable());
    assert!(cmd.decoded().is_pending());
    assert!(matches!(cmd.result(), Err(WireError::ReplyPending)));
    assert_eq!(&cmd.encode().unwrap()[..], b"*2\r\n$4\r\nINCR\r\n$1\r\nn\r\n");
}

#[test]
fn test_read_value() {
    let mut cmd: Cmd<IntReply> = Cmd::with_key("INCR", "n", vec![]);

    cmd.read_reply(&mut reader(":6\r\n")).unwrap();

    assert_eq!(cmd.val(), Some(&6));
    assert_eq!(cmd.result().unwrap(), Some(&6));
    assert!(cmd.err().is_none());
    assert!(!cmd.is_sendable());
}

#[test]
fn test_read_nil_is_not_error() {
    let mut cmd: Cmd<StringReply> = Cmd::with_key("GET", "missing", vec![]);

    cmd.read_reply(&mut reader("$-1\r\n")).unwrap();

    assert!(cmd.decoded().is_nil());
    assert_eq!(cmd.result().unwrap(), None);
    assert_eq!(cmd.into_result().unwrap(), None);
}

#[test]
fn test_read_only_once() {
    let mut cmd: Cmd<IntReply> = Cmd::new("DBSIZE", vec![]);
    let mut rd = reader(":1\r\n:2\r\n");

    cmd.read_reply(&mut rd).unwrap();
    assert!(matches!(
        cmd.read_reply(&mut rd),
        Err(WireError::ReplyAlreadyRead)
    ));
    assert_eq!(cmd.val(), Some(&1));
    assert_eq!(rd.read_int().unwrap(), Some(2));
}

#[test]
fn test_decode_failure_is_stored() {
    let mut cmd: Cmd<BfInfo> = Cmd::with_key("BF.INFO", "bf", vec![]);

    let err = cmd
        .read_reply(&mut reader("%1\r\n+Foo\r\n:1\r\n"))
        .unwrap_err();

    assert!(matches!(err, WireError::UnrecognizedField { .. }));
    assert!(matches!(
        cmd.decoded(),
        DecodedResult::Failed(WireError::UnrecognizedField { .. })
    ));
    assert!(cmd.val().is_none());
}

#[test]
fn test_server_error_is_stored() {
    let mut cmd: Cmd<FloatSliceReply> = Cmd::with_key("TDIGEST.QUANTILE", "t", vec![Arg::from(0.5f64)]);

    let err = cmd.read_reply(&mut reader("-ERR key does not exist\r\n")).unwrap_err();

    assert!(!err.is_stream_fatal());
    match cmd.result() {
        Err(WireError::Server(msg)) => assert_eq!(msg, "ERR key does not exist"),
        other => panic!("Expected Server error, got {:?}", other),
    }
}

#[test]
fn test_wrong_shape_does_not_leak_into_next_command() {
    let mut count: Cmd<IntReply> = Cmd::with_key("SCARD", "s", vec![]);
    let mut get: Cmd<StringReply> = Cmd::with_key("GET", "k", vec![]);
    let mut rd = reader("*2\r\n:1\r\n:2\r\n$5\r\nhello\r\n");

    let err = count.read_reply(&mut rd).unwrap_err();
    assert!(matches!(err, WireError::Shape { .. }));
    assert!(!err.is_stream_fatal());

    get.read_reply(&mut rd).unwrap();
    assert_eq!(get.val().map(String::as_str), Some("hello"));
}

#[test]
fn test_json_map_reply_does_not_leak_into_next_command() {
    let mut doc: Cmd<JsonReply> = Cmd::with_key("JSON.GET", "doc", vec![]);
    let mut set: Cmd<StatusReply> = Cmd::with_key("JSON.SET", "doc", vec![]);
    let mut rd = reader("%1\r\n+a\r\n:1\r\n+OK\r\n");

    assert!(matches!(
        doc.read_reply(&mut rd),
        Err(WireError::Shape { .. })
    ));

    set.read_reply(&mut rd).unwrap();
    assert_eq!(set.val().map(String::as_str), Some("OK"));
}

#[test]
fn test_deep_nesting_fails_without_crashing() {
    let mut cmd: Cmd<ValueReply> = Cmd::new("X.NESTED", vec![]);
    let wire = "*1\r\n".repeat(200_000) + ":1\r\n";

    let err = cmd.read_reply(&mut reader(&wire)).unwrap_err();

    assert!(matches!(err, WireError::Protocol(_)));
    assert!(err.is_stream_fatal());
    assert!(matches!(cmd.err(), Some(WireError::Protocol(_))));
}

#[test]
fn test_timeout_becomes_abort() {
    let mut cmd: Cmd<IntReply> = Cmd::with_key("BLPOP", "q", vec![Arg::from(1i64)]);
    let mut rd = RespReader::new(TimedOut);

    let err = cmd.read_reply(&mut rd).unwrap_err();

    assert!(matches!(err, WireError::Aborted(_)));
    assert!(err.is_stream_fatal());
    assert!(cmd.val().is_none());
}

#[test]
fn test_abort_pending() {
    let mut cmd: Cmd<IntReply> = Cmd::new("PING", vec![]);

    cmd.abort("connection closed");

    assert!(matches!(cmd.err(), Some(WireError::Aborted(_))));
    assert!(matches!(
        cmd.read_reply(&mut reader(":1\r\n")),
        Err(WireError::ReplyAlreadyRead)
    ));
}

// =============================================================================
// Encode Failure Tests
// =============================================================================

#[test]
fn test_unbound_record_fails_before_send() {
    struct Opts {
        count: i64,
    }
    kvwire::impl_project!(Opts { count => "COUNT" });

    let cmd: Cmd<IntReply> = Cmd::with_key("X", "k", vec![Arg::required_record::<Opts>(None)]);

    assert!(!cmd.is_sendable());
    assert!(matches!(cmd.encode(), Err(WireError::ArgumentShape(_))));
    assert_eq!(cmd.command().name(), "X");
    assert_eq!(cmd.command().first_arg(), Some("k"));
}

#[test]
fn test_validation_fails_before_send() {
    let options = RangeOptions {
        by_score: true,
        by_lex: true,
    };

    let cmd: Cmd<StringReply> = Cmd::with_key("ZRANGE", "z", vec![]).with_validated(&options);

    assert!(!cmd.is_sendable());
    assert!(matches!(cmd.into_result(), Err(WireError::Validation(_))));
}

#[test]
fn test_valid_options_pass() {
    let options = RangeOptions {
        by_score: true,
        by_lex: false,
    };

    let cmd: Cmd<StringReply> = Cmd::with_key("ZRANGE", "z", vec![]).with_validated(&options);

    assert!(cmd.is_sendable());
}

#[test]
fn test_set_err_from_caller_check() {
    let values = vec!["f1", "v1", "f2"];
    let mut cmd: Cmd<IntReply> = Cmd::with_key("HSET", "h", vec![Arg::from(values.clone())]);

    if let Err(e) = ensure_pairs(values.len(), "HSET") {
        cmd.set_err(e);
    }

    assert!(!cmd.is_sendable());
    assert!(matches!(cmd.err(), Some(WireError::ArgumentShape(_))));
}
