//! Configuration for kvwire
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::protocol::Command;

/// Main configuration shared by the reply reader and the command writer
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Protocol version negotiated with the server. Under `Resp2` the
    /// reader rejects RESP3-only reply types as a protocol error.
    pub protocol: ProtocolVersion,

    // -------------------------------------------------------------------------
    // Reader Limits
    // -------------------------------------------------------------------------
    /// Largest bulk string the reader will accept (in bytes)
    pub max_bulk_len: usize,

    /// Largest element count of an array, set or map header
    pub max_aggregate_len: usize,

    /// Deepest aggregate nesting the reader will follow
    pub max_nesting_depth: usize,

    // -------------------------------------------------------------------------
    // Writer Configuration
    // -------------------------------------------------------------------------
    /// Initial capacity of the buffer a command is encoded into (in bytes)
    pub write_buffer_capacity: usize,

    // -------------------------------------------------------------------------
    // Deadline Configuration
    // -------------------------------------------------------------------------
    /// Read deadline for ordinary commands (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Added on top of a blocking command's own server-side wait
    pub blocking_margin_ms: u64,
}

/// RESP protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// Maps arrive as flat arrays, nil as `$-1` / `*-1`
    Resp2,

    /// Native maps, doubles, booleans and `_` nil
    Resp3,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: ProtocolVersion::Resp3,
            max_bulk_len: 512 * 1024 * 1024, // 512 MB
            max_aggregate_len: 1 << 24,
            max_nesting_depth: 128,
            write_buffer_capacity: 4 * 1024,
            read_timeout_ms: 3000,
            blocking_margin_ms: 10_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Effective read deadline for a command
    ///
    /// A command carrying its own read timeout waits that long plus the
    /// blocking margin; a zero override means wait forever.
    pub fn read_deadline(&self, command: &Command) -> Option<Duration> {
        match command.read_timeout() {
            Some(timeout) if timeout.is_zero() => None,
            Some(timeout) => Some(timeout + Duration::from_millis(self.blocking_margin_ms)),
            None if self.read_timeout_ms == 0 => None,
            None => Some(Duration::from_millis(self.read_timeout_ms)),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the protocol version
    pub fn protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.config.protocol = protocol;
        self
    }

    /// Set the largest accepted bulk string (in bytes)
    pub fn max_bulk_len(mut self, len: usize) -> Self {
        self.config.max_bulk_len = len;
        self
    }

    /// Set the largest accepted aggregate element count
    pub fn max_aggregate_len(mut self, len: usize) -> Self {
        self.config.max_aggregate_len = len;
        self
    }

    /// Set the deepest accepted aggregate nesting
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }

    /// Set the initial command buffer capacity (in bytes)
    pub fn write_buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.write_buffer_capacity = capacity;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the margin added to blocking commands (in milliseconds)
    pub fn blocking_margin_ms(mut self, ms: u64) -> Self {
        self.config.blocking_margin_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
