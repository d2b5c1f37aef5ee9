//! Argument Flattener
//!
//! Turns the variadic call-site arguments of a command into the flat token
//! tail that follows the command's fixed leading arguments.
//!
//! A lone sequence argument with nothing accumulated before it becomes the
//! tail as-is: the caller's vector is moved in, never copied. The result is
//! token-for-token identical to the copying path.

use super::classify::{Arg, RecordArg};
use super::Token;
use crate::error::{Result, WireError};

/// The variadic tail of an encoded command
#[derive(Debug, Clone, PartialEq)]
pub enum ArgTail {
    /// General tokens
    Tokens(Vec<Token>),

    /// Text only, kept in the caller's own vector
    Strings(Vec<String>),
}

impl Default for ArgTail {
    fn default() -> Self {
        ArgTail::Tokens(Vec::new())
    }
}

impl ArgTail {
    pub fn len(&self) -> usize {
        match self {
            ArgTail::Tokens(tokens) => tokens.len(),
            ArgTail::Strings(strings) => strings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the tail as tokens
    pub fn to_tokens(&self) -> Vec<Token> {
        match self {
            ArgTail::Tokens(tokens) => tokens.clone(),
            ArgTail::Strings(strings) => strings.iter().map(Token::from).collect(),
        }
    }

    /// Wire bytes of the element at `index`
    pub fn wire_bytes(&self, index: usize) -> Option<Vec<u8>> {
        match self {
            ArgTail::Tokens(tokens) => tokens.get(index).map(|token| {
                let mut out = Vec::new();
                token.append_wire_bytes(&mut out);
                out
            }),
            ArgTail::Strings(strings) => strings.get(index).map(|s| s.as_bytes().to_vec()),
        }
    }
}

/// Flatten call-site arguments into a command tail
pub fn flatten(args: Vec<Arg>) -> Result<ArgTail> {
    flatten_onto(Vec::new(), args)
}

/// Flatten call-site arguments after tokens already accumulated in `dst`
pub fn flatten_onto(mut dst: Vec<Token>, mut args: Vec<Arg>) -> Result<ArgTail> {
    if args.len() == 1 && dst.is_empty() {
        match args.pop() {
            Some(Arg::Seq(tokens)) => return Ok(ArgTail::Tokens(tokens)),
            Some(Arg::Strings(strings)) => return Ok(ArgTail::Strings(strings)),
            Some(Arg::StringMap(map)) => {
                let mut strings = Vec::with_capacity(map.len() * 2);
                for (key, value) in map {
                    strings.push(key);
                    strings.push(value);
                }
                return Ok(ArgTail::Strings(strings));
            }
            Some(other) => args.push(other),
            None => {}
        }
    }

    for arg in args {
        append_arg(&mut dst, arg)?;
    }
    Ok(ArgTail::Tokens(dst))
}

/// Append one argument's tokens to `dst`
pub fn append_arg(dst: &mut Vec<Token>, arg: Arg) -> Result<()> {
    match arg {
        Arg::Scalar(token) => dst.push(token),
        Arg::Seq(tokens) => dst.extend(tokens),
        Arg::Strings(strings) => dst.extend(strings.into_iter().map(Token::Text)),
        Arg::Map(map) => {
            dst.reserve(map.len() * 2);
            for (key, value) in map {
                dst.push(Token::Text(key));
                dst.push(value);
            }
        }
        Arg::StringMap(map) => {
            dst.reserve(map.len() * 2);
            for (key, value) in map {
                dst.push(Token::Text(key));
                dst.push(Token::Text(value));
            }
        }
        Arg::Record(RecordArg::Fields(fields)) => {
            dst.reserve(fields.len() * 2);
            for field in fields {
                dst.push(Token::Text(field.name.to_string()));
                dst.push(field.value);
            }
        }
        Arg::Record(RecordArg::Absent) => {}
        Arg::Record(RecordArg::Unbound(type_name)) => {
            return Err(WireError::ArgumentShape(format!(
                "record argument of type {} is not bound to a value",
                type_name
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Encode-time Checks
// =============================================================================

/// A paired argument list (field/value, key/value, ...) must have even length
pub fn ensure_pairs(len: usize, what: &str) -> Result<()> {
    if len % 2 != 0 {
        return Err(WireError::ArgumentShape(format!(
            "{}: invalid number of arguments, must be even (got {})",
            what, len
        )));
    }
    Ok(())
}

/// An argument count must fall within `min..=max`
pub fn ensure_count(len: usize, min: usize, max: usize, what: &str) -> Result<()> {
    if len < min || len > max {
        return Err(WireError::ArgumentShape(format!(
            "{}: expected between {} and {} arguments, got {}",
            what, min, max, len
        )));
    }
    Ok(())
}

/// Option records that carry their own invariants
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
