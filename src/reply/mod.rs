//! Reply Module
//!
//! Reply shapes, generic reply values, and the reader primitives every
//! decoder is written against.
//!
//! ## Reply Shapes
//! ```text
//!            peek_shape()
//!                 │
//!   ┌──────┬──────┼────────┬─────────┬───────┬─────┬───────┐
//!   ▼      ▼      ▼        ▼         ▼       ▼     ▼       ▼
//! array   map   string  integer   float    bool   nil   error
//! ```
//!
//! A command may legally reply as an array under RESP2 and as a map under
//! RESP3; `read_map_len` accepts both.

mod reader;
mod resp;
mod shape;

pub use reader::ReplyReader;
pub use resp::RespReader;
pub use shape::{ReplyShape, Value};

/// Upper bound on capacity reserved up front from an untrusted length prefix
pub(crate) const PREALLOC_LIMIT: usize = 1024;
