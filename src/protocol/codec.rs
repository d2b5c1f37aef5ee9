//! Protocol codec
//!
//! Writes commands as RESP arrays of bulk strings.
//!
//! ## Wire Format
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<name>\r\n
//! $<len>\r\n<arg 1>\r\n
//! ...
//! ```
//!
//! Every token is a bulk string: integers and floats as decimal text, IP
//! addresses as raw octets, bytes verbatim.

use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};

use super::Command;
use crate::args::{ArgTail, Token};
use crate::config::Config;
use crate::error::Result;

/// Per-token framing overhead: `$`, up to 20 length digits, two CRLFs
const BULK_OVERHEAD: usize = 1 + 20 + 4;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Bytes {
    let mut buf = BytesMut::with_capacity(estimate_len(command));
    encode_command_into(command, &mut buf);
    buf.freeze()
}

/// Append an encoded command to `buf`
pub fn encode_command_into(command: &Command, buf: &mut BytesMut) {
    put_header(buf, b'*', command.len());

    put_bulk(buf, command.name().as_bytes());
    if let Some(first) = command.first_arg() {
        put_bulk(buf, first.as_bytes());
    }
    if let Some(second) = command.second_arg() {
        put_bulk(buf, second.as_bytes());
    }

    match command.tail() {
        ArgTail::Strings(strings) => {
            for s in strings {
                put_bulk(buf, s.as_bytes());
            }
        }
        ArgTail::Tokens(tokens) => {
            let mut scratch = Vec::new();
            for token in tokens {
                put_token(buf, token, &mut scratch);
            }
        }
    }
}

fn put_header(buf: &mut BytesMut, kind: u8, len: usize) {
    buf.put_u8(kind);
    buf.put_slice(len.to_string().as_bytes());
    buf.put_slice(b"\r\n");
}

fn put_bulk(buf: &mut BytesMut, bytes: &[u8]) {
    put_header(buf, b'$', bytes.len());
    buf.put_slice(bytes);
    buf.put_slice(b"\r\n");
}

fn put_token(buf: &mut BytesMut, token: &Token, scratch: &mut Vec<u8>) {
    match token {
        Token::Text(s) => put_bulk(buf, s.as_bytes()),
        Token::Bytes(b) => put_bulk(buf, b),
        other => {
            scratch.clear();
            other.append_wire_bytes(scratch);
            put_bulk(buf, scratch);
        }
    }
}

fn estimate_len(command: &Command) -> usize {
    let fixed = command.name().len()
        + command.first_arg().map_or(0, str::len)
        + command.second_arg().map_or(0, str::len);
    let tail: usize = match command.tail() {
        ArgTail::Strings(strings) => strings.iter().map(String::len).sum(),
        ArgTail::Tokens(tokens) => tokens
            .iter()
            .map(|token| match token {
                Token::Text(s) => s.len(),
                Token::Bytes(b) => b.len(),
                _ => 24,
            })
            .sum(),
    };
    BULK_OVERHEAD * (command.len() + 1) + fixed + tail
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Buffers encoded commands and writes them out in one go
pub struct CommandWriter<W> {
    /// Destination stream
    inner: W,

    /// Commands encoded but not yet written
    buf: BytesMut,
}

impl<W: Write> CommandWriter<W> {
    /// Create a writer with the buffer capacity from `config`
    pub fn new(inner: W, config: &Config) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(config.write_buffer_capacity),
        }
    }

    /// Encode a command into the buffer
    pub fn queue(&mut self, command: &Command) {
        encode_command_into(command, &mut self.buf);
    }

    /// Bytes queued but not yet written
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Write every queued command and flush the stream
    pub fn flush(&mut self) -> Result<()> {
        self.inner.write_all(&self.buf)?;
        self.buf.clear();
        self.inner.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
