//! Command/Result Handle
//!
//! A [`Cmd`] is created with its command already encoded. The transport
//! sends it (unless encoding failed) and later hands the reply stream to
//! [`Cmd::read_reply`], which decodes exactly once. From then on the handle
//! is read-only.
//!
//! ## Lifecycle
//! ```text
//!  new ──► Pending ──read_reply──► Value(T) | Nil | Failed(err)
//!   │
//!   └─(encode error)──► Failed(err)   never sent
//! ```

use std::io;
use std::marker::PhantomData;

use bytes::Bytes;

use super::{encode_command, Command};
use crate::args::{Arg, Validate};
use crate::decode::{decode_reply, Decode};
use crate::error::{Result, WireError};
use crate::reply::ReplyReader;

/// Outcome slot of a command
#[derive(Debug, Clone)]
pub enum DecodedResult<T> {
    /// No reply yet
    Pending,

    /// Decoded value
    Value(T),

    /// The server sent a protocol nil
    Nil,

    /// Encoding or decoding failed
    Failed(WireError),
}

impl<T> DecodedResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, DecodedResult::Pending)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, DecodedResult::Nil)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            DecodedResult::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&WireError> {
        match self {
            DecodedResult::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// A command together with its typed result
pub struct Cmd<D: Decode> {
    command: Command,
    result: DecodedResult<D::Output>,
    _decoder: PhantomData<fn() -> D>,
}

impl<D: Decode> Cmd<D> {
    /// Command with no fixed leading arguments
    pub fn new(name: &str, args: Vec<Arg>) -> Self {
        Self::build(name, None, None, args)
    }

    /// Command with one fixed leading argument
    pub fn with_key(name: &str, key: &str, args: Vec<Arg>) -> Self {
        Self::build(name, Some(key), None, args)
    }

    /// Command with two fixed leading arguments
    pub fn with_keys(name: &str, first: &str, second: &str, args: Vec<Arg>) -> Self {
        Self::build(name, Some(first), Some(second), args)
    }

    fn build(name: &str, first: Option<&str>, second: Option<&str>, args: Vec<Arg>) -> Self {
        let first = first.map(str::to_string);
        let second = second.map(str::to_string);

        match crate::args::flatten(args) {
            Ok(tail) => Self::from_command(Command::from_parts(name, first, second, tail)),
            Err(err) => Self::failed(
                Command::from_parts(name, first, second, Default::default()),
                err,
            ),
        }
    }

    /// Wrap an encoded command
    pub fn from_command(command: Command) -> Self {
        Self {
            command,
            result: DecodedResult::Pending,
            _decoder: PhantomData,
        }
    }

    /// A command that failed before it could be sent
    pub fn failed(command: Command, err: WireError) -> Self {
        tracing::debug!("Command {} failed to encode: {}", command.name(), err);
        Self {
            command,
            result: DecodedResult::Failed(err),
            _decoder: PhantomData,
        }
    }

    /// Check an option record; a violation fails the command before sending
    pub fn with_validated<V: Validate + ?Sized>(mut self, options: &V) -> Self {
        if self.result.is_pending() {
            if let Err(err) = options.validate() {
                tracing::debug!("Command {} rejected: {}", self.command.name(), err);
                self.result = DecodedResult::Failed(err);
            }
        }
        self
    }

    /// Record an error found by the caller
    pub fn set_err(&mut self, err: WireError) {
        self.result = DecodedResult::Failed(err);
    }

    // =========================================================================
    // Transport-facing
    // =========================================================================

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn command_mut(&mut self) -> &mut Command {
        &mut self.command
    }

    /// Whether the transport should send this command
    pub fn is_sendable(&self) -> bool {
        self.result.is_pending()
    }

    /// Wire bytes to send; fails if the command already holds an error
    pub fn encode(&self) -> Result<Bytes> {
        match &self.result {
            DecodedResult::Failed(err) => Err(err.clone()),
            DecodedResult::Pending => Ok(encode_command(&self.command)),
            _ => Err(WireError::ReplyAlreadyRead),
        }
    }

    /// Decode the reply to this command from `rd`
    ///
    /// Runs at most once. The error, if any, is stored on the handle and
    /// also returned so the transport can tell whether the stream survived
    /// (see [`WireError::is_stream_fatal`]).
    pub fn read_reply<R: ReplyReader + ?Sized>(&mut self, rd: &mut R) -> Result<()> {
        if !self.result.is_pending() {
            return Err(WireError::ReplyAlreadyRead);
        }

        self.result = match decode_reply::<D, R>(rd) {
            Ok(Some(value)) => DecodedResult::Value(value),
            Ok(None) => DecodedResult::Nil,
            Err(err) => {
                let err = deadline_to_abort(err);
                tracing::debug!("Reply to {} failed to decode: {}", self.command.name(), err);
                DecodedResult::Failed(err)
            }
        };
        tracing::trace!("Reply to {} read", self.command.name());

        match &self.result {
            DecodedResult::Failed(err) => Err(err.clone()),
            _ => Ok(()),
        }
    }

    /// The transport gave up on the reply (deadline, connection loss)
    pub fn abort(&mut self, reason: impl Into<String>) {
        if self.result.is_pending() {
            self.result = DecodedResult::Failed(WireError::Aborted(reason.into()));
        }
    }

    // =========================================================================
    // Caller-facing
    // =========================================================================

    /// Current outcome slot
    pub fn decoded(&self) -> &DecodedResult<D::Output> {
        &self.result
    }

    /// `Ok(Some)` for a value, `Ok(None)` for protocol nil
    pub fn result(&self) -> Result<Option<&D::Output>> {
        match &self.result {
            DecodedResult::Value(value) => Ok(Some(value)),
            DecodedResult::Nil => Ok(None),
            DecodedResult::Failed(err) => Err(err.clone()),
            DecodedResult::Pending => Err(WireError::ReplyPending),
        }
    }

    /// Decoded value, if there is one
    pub fn val(&self) -> Option<&D::Output> {
        self.result.value()
    }

    pub fn err(&self) -> Option<&WireError> {
        self.result.error()
    }

    /// Consume the handle, keeping only the outcome
    pub fn into_result(self) -> Result<Option<D::Output>> {
        match self.result {
            DecodedResult::Value(value) => Ok(Some(value)),
            DecodedResult::Nil => Ok(None),
            DecodedResult::Failed(err) => Err(err),
            DecodedResult::Pending => Err(WireError::ReplyPending),
        }
    }
}

impl<D: Decode> std::fmt::Debug for Cmd<D>
where
    D::Output: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cmd")
            .field("command", &self.command)
            .field("result", &self.result)
            .finish()
    }
}

/// Read deadlines surface as io timeouts; report them as an aborted decode
fn deadline_to_abort(err: WireError) -> WireError {
    match &err {
        WireError::Io(io_err)
            if matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) =>
        {
            WireError::Aborted(format!("read deadline exceeded: {}", io_err))
        }
        _ => err,
    }
}
