//! Argument Encoding Module
//!
//! Turns idiomatically-typed call arguments into wire tokens.
//!
//! ## Flow
//! ```text
//! call-site values ──► Arg (closed union) ──► classify ──┬─► pass-through ─┐
//!                                                        ├─► sequence ─────┤
//!                                                        ├─► mapping ──────┼─► ArgTail
//!                                                        └─► record ───────┘
//!                                                             (Project)
//! ```

mod classify;
mod flatten;
mod project;
mod token;
pub mod units;

pub use classify::{classify, Arg, ArgClass, RecordArg};
pub use flatten::{
    append_arg, ensure_count, ensure_pairs, flatten, flatten_onto, ArgTail, Validate,
};
pub use project::{
    project, project_into, FieldSink, FieldTag, FieldValue, Project, TaggedField, IGNORE,
    SKIP_IF_DEFAULT,
};
pub use token::Token;
pub(crate) use token::format_float;
