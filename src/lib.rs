//! # kvwire
//!
//! The wire layer of a RESP key-value client:
//! - Flattening heterogeneous command arguments into one token list
//! - Projecting option records into `NAME value` pairs
//! - Reading RESP2/RESP3 replies through a pull-style reader
//! - Decoding replies into typed results, one decoder per reply kind
//!
//! ## Data Flow
//!
//! ```text
//!   caller args (Vec<Arg>)
//!          │
//! ┌────────▼────────────────────────────────────────────────────┐
//! │                    args::flatten                             │
//! │       (scalars, sequences, maps, projected records)          │
//! └────────┬────────────────────────────────────────────────────┘
//!          │ ArgTail
//! ┌────────▼────────┐   encode    ┌──────────────┐
//! │ protocol::Cmd<D>├────────────►│  transport   │
//! │  (Pending)      │◄────────────┤  (not here)  │
//! └────────┬────────┘  reply rd   └──────────────┘
//!          │ read_reply
//! ┌────────▼────────────────────────────────────────────────────┐
//! │        decode::Decode  ◄──  reply::ReplyReader               │
//! │   Value(T) | Nil | Failed(WireError)   (RespReader)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod args;
pub mod reply;
pub mod decode;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, WireError};
pub use config::{Config, ProtocolVersion};
pub use args::{flatten, Arg, ArgTail, Project, Token};
pub use reply::{ReplyReader, ReplyShape, RespReader, Value};
pub use decode::Decode;
pub use protocol::{Cmd, Command, DecodedResult};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
