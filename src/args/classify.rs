//! Scalar Classifier
//!
//! Call-site arguments are resolved once into the closed [`Arg`] union;
//! [`classify`] then tells the flattener how each one expands.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::{Duration, SystemTime};

use bytes::Bytes;

use super::project::{project, Project, TaggedField};
use super::Token;

/// One call-site argument of a command
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A single token, passed through as-is
    Scalar(Token),

    /// An ordered sequence of tokens
    Seq(Vec<Token>),

    /// An ordered sequence of text
    Strings(Vec<String>),

    /// String-keyed mapping of arbitrary values
    Map(HashMap<String, Token>),

    /// String-keyed mapping of text
    StringMap(HashMap<String, String>),

    /// A tagged record, already projected
    Record(RecordArg),
}

/// A record argument after resolving its reference
#[derive(Debug, Clone, PartialEq)]
pub enum RecordArg {
    /// Fields that survived the tag rules
    Fields(Vec<TaggedField>),

    /// An optional record that was not supplied: contributes nothing
    Absent,

    /// A required record reference that points at nothing
    Unbound(&'static str),
}

/// How the flattener expands an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgClass {
    /// Exactly one token
    PassThrough,

    /// Each element in order
    Sequence,

    /// Each entry as a key token followed by a value token
    Mapping,

    /// The projected fields as name/value pairs
    Record,
}

/// Classify a call-site argument
pub fn classify(arg: &Arg) -> ArgClass {
    match arg {
        Arg::Scalar(_) => ArgClass::PassThrough,
        Arg::Seq(_) | Arg::Strings(_) => ArgClass::Sequence,
        Arg::Map(_) | Arg::StringMap(_) => ArgClass::Mapping,
        Arg::Record(_) => ArgClass::Record,
    }
}

impl Arg {
    /// A record passed by reference
    pub fn record<T: Project + ?Sized>(record: &T) -> Self {
        Arg::Record(RecordArg::Fields(project(record)))
    }

    /// An optional record; `None` contributes zero tokens
    pub fn optional_record<T: Project>(record: Option<&T>) -> Self {
        match record {
            Some(record) => Arg::record(record),
            None => Arg::Record(RecordArg::Absent),
        }
    }

    /// A record that must be present; `None` fails the command at encode time
    pub fn required_record<T: Project>(record: Option<&T>) -> Self {
        match record {
            Some(record) => Arg::record(record),
            None => Arg::Record(RecordArg::Unbound(std::any::type_name::<T>())),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! scalar_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Scalar(Token::from(value))
                }
            }
        )*
    };
}

scalar_arg!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, Bytes, IpAddr,
    Ipv4Addr, Ipv6Addr, Duration, SystemTime
);

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Scalar(Token::from(value))
    }
}

impl From<Token> for Arg {
    fn from(token: Token) -> Self {
        Arg::Scalar(token)
    }
}

impl From<Vec<Token>> for Arg {
    fn from(tokens: Vec<Token>) -> Self {
        Arg::Seq(tokens)
    }
}

impl From<Vec<String>> for Arg {
    fn from(strings: Vec<String>) -> Self {
        Arg::Strings(strings)
    }
}

impl From<Vec<&str>> for Arg {
    fn from(strings: Vec<&str>) -> Self {
        Arg::Strings(strings.into_iter().map(str::to_string).collect())
    }
}

impl From<HashMap<String, Token>> for Arg {
    fn from(map: HashMap<String, Token>) -> Self {
        Arg::Map(map)
    }
}

impl From<HashMap<String, String>> for Arg {
    fn from(map: HashMap<String, String>) -> Self {
        Arg::StringMap(map)
    }
}
