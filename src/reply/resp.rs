//! RESP reply reader
//!
//! Reads RESP2 and RESP3 replies from any buffered byte stream.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬───────────────────┬──────┬────────────────────┐
//! │ Type (1) │ Line (len / text) │ CRLF │ Body (bulk only)   │
//! └──────────┴───────────────────┴──────┴────────────────────┘
//! ```
//!
//! ### Types
//! - `+` simple string, `-` error, `:` integer, `$` bulk string
//! - `*` array, `%` map, `~` set, `>` push, `|` attribute (skipped)
//! - `_` nil, `,` double, `#` boolean, `(` big number
//! - `=` verbatim string, `!` blob error
//!
//! The next header is read ahead into `pending` on peek, so peeking never
//! loses data and a shape mismatch leaves the reply in place.

use std::io::{self, BufRead, Read};

use bytes::Bytes;

use super::{ReplyReader, ReplyShape, Value, PREALLOC_LIMIT};
use crate::config::{Config, ProtocolVersion};
use crate::error::{Result, WireError};

/// Header line of one reply
#[derive(Debug, Clone)]
struct Header {
    /// Type byte
    kind: u8,

    /// Line content without type byte and CRLF
    line: String,
}

impl Header {
    fn is_null_len(&self) -> bool {
        self.line == "-1"
    }

    fn shape(&self) -> Result<ReplyShape> {
        let shape = match self.kind {
            b'*' | b'~' | b'>' if self.is_null_len() => ReplyShape::Nil,
            b'*' | b'~' | b'>' => ReplyShape::Array,
            b'%' => ReplyShape::Map,
            b'$' if self.is_null_len() => ReplyShape::Nil,
            b'$' | b'+' | b'=' | b'(' => ReplyShape::String,
            b':' => ReplyShape::Integer,
            b',' => ReplyShape::Float,
            b'#' => ReplyShape::Bool,
            b'_' => ReplyShape::Nil,
            b'-' | b'!' => ReplyShape::Error,
            other => {
                return Err(WireError::Protocol(format!(
                    "Unknown reply type: 0x{:02x}",
                    other
                )))
            }
        };
        Ok(shape)
    }

    /// Whether the scalar carries a length-prefixed body
    fn has_body(&self) -> bool {
        matches!(self.kind, b'$' | b'=' | b'!')
    }
}

/// Type bytes a RESP2 server never sends
fn is_resp3_only(kind: u8) -> bool {
    matches!(
        kind,
        b'%' | b'~' | b'>' | b'|' | b'_' | b',' | b'#' | b'(' | b'=' | b'!'
    )
}

/// RESP implementation of [`ReplyReader`]
pub struct RespReader<R> {
    /// Underlying buffered stream
    inner: R,

    /// Header read ahead by a peek
    pending: Option<Header>,

    /// Scratch buffer for header lines
    line: Vec<u8>,

    /// Largest accepted bulk string
    max_bulk_len: usize,

    /// Largest accepted aggregate element count
    max_aggregate_len: usize,

    /// Deepest accepted aggregate nesting
    max_nesting_depth: usize,

    /// Aggregates currently open in `read_value` / `skip`
    depth: usize,

    /// Protocol the server was asked to speak
    protocol: ProtocolVersion,

    /// Reply headers consumed so far
    headers_read: u64,
}

impl<R: BufRead> RespReader<R> {
    /// Create a reader with default limits
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, &Config::default())
    }

    /// Create a reader with the limits from `config`
    pub fn with_config(inner: R, config: &Config) -> Self {
        Self {
            inner,
            pending: None,
            line: Vec::with_capacity(64),
            max_bulk_len: config.max_bulk_len,
            max_aggregate_len: config.max_aggregate_len,
            max_nesting_depth: config.max_nesting_depth,
            depth: 0,
            protocol: config.protocol,
            headers_read: 0,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // =========================================================================
    // Framing
    // =========================================================================

    fn read_header_line(&mut self) -> Result<Header> {
        self.line.clear();
        let read = self.inner.read_until(b'\n', &mut self.line)?;
        if read == 0 || !self.line.ends_with(b"\n") {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "reply stream ended").into());
        }
        if self.line.len() < 3 || !self.line.ends_with(b"\r\n") {
            return Err(WireError::Protocol(format!(
                "Malformed reply line: {:?}",
                String::from_utf8_lossy(&self.line)
            )));
        }

        let kind = self.line[0];
        if self.protocol == ProtocolVersion::Resp2 && is_resp3_only(kind) {
            return Err(WireError::Protocol(format!(
                "RESP3 reply type {:?} on a RESP2 connection",
                kind as char
            )));
        }

        Ok(Header {
            kind,
            line: String::from_utf8_lossy(&self.line[1..self.line.len() - 2]).into_owned(),
        })
    }

    /// Make sure a header is pending, skipping attribute replies
    fn fill(&mut self) -> Result<()> {
        while self.pending.is_none() {
            let header = self.read_header_line()?;
            if header.kind == b'|' {
                let pairs = self.aggregate_len(&header)?.unwrap_or(0);
                self.nested(|rd| (0..pairs * 2).try_for_each(|_| rd.skip()))?;
                continue;
            }
            self.pending = Some(header);
        }
        Ok(())
    }

    fn take(&mut self) -> Result<Header> {
        self.fill()?;
        let header = self
            .pending
            .take()
            .ok_or_else(|| WireError::Protocol("No reply header available".to_string()))?;
        self.headers_read += 1;
        Ok(header)
    }

    /// Run `read` one aggregate level deeper, failing past the nesting limit
    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_nesting_depth {
            return Err(WireError::Protocol(format!(
                "Reply nested deeper than {} levels",
                self.max_nesting_depth
            )));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn parse_len(&self, header: &Header, limit: usize) -> Result<Option<usize>> {
        let len: i64 = header.line.parse().map_err(|_| {
            WireError::Protocol(format!("Invalid length prefix: {:?}", header.line))
        })?;
        if len == -1 {
            return Ok(None);
        }
        if len < 0 || len as u64 > limit as u64 {
            return Err(WireError::Protocol(format!(
                "Length prefix out of range: {} (max {})",
                len, limit
            )));
        }
        Ok(Some(len as usize))
    }

    fn aggregate_len(&self, header: &Header) -> Result<Option<usize>> {
        self.parse_len(header, self.max_aggregate_len)
    }

    fn bulk_len(&self, header: &Header) -> Result<Option<usize>> {
        self.parse_len(header, self.max_bulk_len)
    }

    fn read_body(&mut self, len: usize, buf: &mut Vec<u8>) -> Result<()> {
        buf.clear();
        buf.resize(len, 0);
        self.inner.read_exact(buf)?;

        let mut crlf = [0u8; 2];
        self.inner.read_exact(&mut crlf)?;
        if crlf != *b"\r\n" {
            return Err(WireError::Protocol(
                "Bulk string not terminated by CRLF".to_string(),
            ));
        }
        Ok(())
    }

    fn discard(&mut self, len: usize) -> Result<()> {
        let copied = io::copy(&mut (&mut self.inner).take(len as u64), &mut io::sink())?;
        if copied < len as u64 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "reply stream ended").into());
        }
        Ok(())
    }

    /// Consume a scalar and copy its raw bytes into `buf`
    ///
    /// Returns `false` for a nil bulk string.
    fn take_scalar(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        let header = self.take()?;
        if !header.has_body() {
            buf.clear();
            buf.extend_from_slice(header.line.as_bytes());
            return Ok(true);
        }

        let Some(len) = self.bulk_len(&header)? else {
            return Ok(false);
        };
        self.read_body(len, buf)?;
        if header.kind == b'=' {
            strip_verbatim_format(buf);
        }
        Ok(true)
    }

    /// Consume a text scalar as a String
    fn take_text(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if !self.take_scalar(&mut buf)? {
            return Ok(None);
        }
        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| WireError::scalar_parse(&String::from_utf8_lossy(e.as_bytes()), "invalid UTF-8"))
    }

    /// Consume an error reply
    fn take_error(&mut self) -> Result<WireError> {
        let mut buf = Vec::new();
        self.take_scalar(&mut buf)?;
        Ok(WireError::Server(String::from_utf8_lossy(&buf).into_owned()))
    }
}

impl<R: BufRead> ReplyReader for RespReader<R> {
    fn peek_shape(&mut self) -> Result<ReplyShape> {
        self.fill()?;
        match &self.pending {
            Some(header) => header.shape(),
            None => Err(WireError::Protocol("No reply header available".to_string())),
        }
    }

    fn read_array_len(&mut self) -> Result<usize> {
        match self.peek_shape()? {
            ReplyShape::Array => {
                let header = self.take()?;
                Ok(self.aggregate_len(&header)?.unwrap_or(0))
            }
            ReplyShape::Error => Err(self.take_error()?),
            found => Err(WireError::Shape {
                expected: "array",
                found,
            }),
        }
    }

    fn read_map_len(&mut self) -> Result<usize> {
        match self.peek_shape()? {
            ReplyShape::Map => {
                let header = self.take()?;
                Ok(self.aggregate_len(&header)?.unwrap_or(0))
            }
            ReplyShape::Array => {
                let header = self.take()?;
                let len = self.aggregate_len(&header)?.unwrap_or(0);
                if len % 2 != 0 {
                    return Err(WireError::Protocol(format!(
                        "Map reply as flat array needs even length, got {}",
                        len
                    )));
                }
                Ok(len / 2)
            }
            ReplyShape::Error => Err(self.take_error()?),
            found => Err(WireError::Shape {
                expected: "map",
                found,
            }),
        }
    }

    fn read_int(&mut self) -> Result<Option<i64>> {
        match self.peek_shape()? {
            ReplyShape::Nil => {
                self.skip()?;
                Ok(None)
            }
            ReplyShape::Integer | ReplyShape::String => {
                let Some(text) = self.take_text()? else {
                    return Ok(None);
                };
                text.parse()
                    .map(Some)
                    .map_err(|e| WireError::scalar_parse(&text, e))
            }
            ReplyShape::Error => Err(self.take_error()?),
            found => Err(WireError::Shape {
                expected: "integer",
                found,
            }),
        }
    }

    fn read_float(&mut self) -> Result<Option<f64>> {
        match self.peek_shape()? {
            ReplyShape::Nil => {
                self.skip()?;
                Ok(None)
            }
            ReplyShape::Float | ReplyShape::Integer | ReplyShape::String => {
                let Some(text) = self.take_text()? else {
                    return Ok(None);
                };
                parse_float(&text).map(Some)
            }
            ReplyShape::Error => Err(self.take_error()?),
            found => Err(WireError::Shape {
                expected: "float",
                found,
            }),
        }
    }

    fn read_string(&mut self) -> Result<Option<String>> {
        match self.peek_shape()? {
            ReplyShape::Nil => {
                self.skip()?;
                Ok(None)
            }
            ReplyShape::String | ReplyShape::Integer | ReplyShape::Float => self.take_text(),
            ReplyShape::Error => Err(self.take_error()?),
            found => Err(WireError::Shape {
                expected: "string",
                found,
            }),
        }
    }

    fn read_string_into(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        match self.peek_shape()? {
            ReplyShape::Nil => {
                self.skip()?;
                buf.clear();
                Ok(false)
            }
            ReplyShape::String | ReplyShape::Integer | ReplyShape::Float => self.take_scalar(buf),
            ReplyShape::Error => Err(self.take_error()?),
            found => Err(WireError::Shape {
                expected: "string",
                found,
            }),
        }
    }

    fn read_bool(&mut self) -> Result<Option<bool>> {
        match self.peek_shape()? {
            ReplyShape::Nil => {
                self.skip()?;
                Ok(None)
            }
            ReplyShape::Bool => {
                let header = self.take()?;
                match header.line.as_str() {
                    "t" => Ok(Some(true)),
                    "f" => Ok(Some(false)),
                    other => Err(WireError::scalar_parse(other, "invalid boolean")),
                }
            }
            ReplyShape::Integer => Ok(self.read_int()?.map(|n| n == 1)),
            ReplyShape::String => Ok(self.take_text()?.map(|s| s == "OK")),
            ReplyShape::Error => Err(self.take_error()?),
            found => Err(WireError::Shape {
                expected: "bool",
                found,
            }),
        }
    }

    fn read_value(&mut self) -> Result<Value> {
        let header = self.take()?;
        let value = match header.kind {
            b'_' => Value::Nil,
            b'+' | b'(' => Value::Text(header.line),
            b'-' => Value::Error(header.line),
            b':' => Value::Int(
                header
                    .line
                    .parse()
                    .map_err(|e| WireError::scalar_parse(&header.line, e))?,
            ),
            b',' => Value::Float(parse_float(&header.line)?),
            b'#' => match header.line.as_str() {
                "t" => Value::Bool(true),
                "f" => Value::Bool(false),
                other => return Err(WireError::scalar_parse(other, "invalid boolean")),
            },
            b'$' | b'=' | b'!' => {
                let Some(len) = self.bulk_len(&header)? else {
                    return Ok(Value::Nil);
                };
                let mut buf = Vec::new();
                self.read_body(len, &mut buf)?;
                if header.kind == b'=' {
                    strip_verbatim_format(&mut buf);
                }
                match (header.kind, String::from_utf8(buf)) {
                    (b'!', Ok(text)) => Value::Error(text),
                    (b'!', Err(e)) => Value::Error(String::from_utf8_lossy(e.as_bytes()).into_owned()),
                    (_, Ok(text)) => Value::Text(text),
                    (_, Err(e)) => Value::Bytes(Bytes::from(e.into_bytes())),
                }
            }
            b'*' | b'~' | b'>' => {
                let Some(len) = self.aggregate_len(&header)? else {
                    return Ok(Value::Nil);
                };
                Value::Array(self.nested(|rd| {
                    let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                    let mut failure = None;
                    for _ in 0..len {
                        match rd.read_value() {
                            Ok(item) => items.push(item),
                            Err(e) => keep_first(&mut failure, e)?,
                        }
                    }
                    failure.map_or(Ok(items), Err)
                })?)
            }
            b'%' => {
                let len = self.aggregate_len(&header)?.unwrap_or(0);
                Value::Map(self.nested(|rd| {
                    let mut pairs = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                    let mut failure = None;
                    for _ in 0..len {
                        match (rd.read_value(), rd.read_value()) {
                            (Ok(key), Ok(value)) => pairs.push((key, value)),
                            (Err(e), _) | (_, Err(e)) => keep_first(&mut failure, e)?,
                        }
                    }
                    failure.map_or(Ok(pairs), Err)
                })?)
            }
            other => {
                return Err(WireError::Protocol(format!(
                    "Unknown reply type: 0x{:02x}",
                    other
                )))
            }
        };
        Ok(value)
    }

    fn headers_read(&self) -> u64 {
        self.headers_read
    }

    fn skip(&mut self) -> Result<()> {
        let header = self.take()?;
        match header.kind {
            b'$' | b'=' | b'!' => {
                if let Some(len) = self.bulk_len(&header)? {
                    self.discard(len + 2)?;
                }
            }
            b'*' | b'~' | b'>' => {
                let len = self.aggregate_len(&header)?.unwrap_or(0);
                self.nested(|rd| (0..len).try_for_each(|_| rd.skip()))?;
            }
            b'%' => {
                let len = self.aggregate_len(&header)?.unwrap_or(0);
                self.nested(|rd| (0..len * 2).try_for_each(|_| rd.skip()))?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Elements of a generic aggregate are each read in full, so a bad scalar
/// inside one can be reported once the whole aggregate is consumed
fn keep_first(failure: &mut Option<WireError>, err: WireError) -> Result<()> {
    if err.is_stream_fatal() {
        return Err(err);
    }
    failure.get_or_insert(err);
    Ok(())
}

/// Verbatim strings start with a three letter format and a colon (`txt:`)
fn strip_verbatim_format(buf: &mut Vec<u8>) {
    if buf.len() >= 4 && buf[3] == b':' {
        buf.drain(..4);
    }
}

/// Decimal text to float, accepting `inf`, `-inf` and `nan`
fn parse_float(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|e| WireError::scalar_parse(text, e))
}
