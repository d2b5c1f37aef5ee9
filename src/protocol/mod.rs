//! Protocol Module
//!
//! The request side of the wire and the per-command result handle.
//!
//! ## Request Format (RESP)
//! ```text
//! ┌────────────┬──────────────┬───────────────┬───────────────┬─────┐
//! │ *<argc>    │ $<len> name  │ $<len> first  │ $<len> second │ ... │
//! └────────────┴──────────────┴───────────────┴───────────────┴─────┘
//! ```
//!
//! ### Pieces
//! - [`Command`]: name, fixed leading arguments, flattened tail
//! - [`encode_command`] / [`CommandWriter`]: RESP framing
//! - [`Cmd`]: a command plus its [`DecodedResult`]

mod codec;
mod command;
mod result;

pub use codec::{encode_command, encode_command_into, write_command, CommandWriter};
pub use command::{Command, DEFAULT_FIRST_KEY_POS};
pub use result::{Cmd, DecodedResult};
