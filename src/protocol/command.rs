//! Command definitions
//!
//! An encoded request: name, up to two fixed leading arguments, and the
//! flattened variadic tail.

use std::fmt;
use std::time::Duration;

use crate::args::{flatten, Arg, ArgTail, Token};
use crate::error::Result;

/// Position of the first key when a command does not say otherwise
pub const DEFAULT_FIRST_KEY_POS: usize = 1;

/// A fully encoded command
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Command name, e.g. `HSET` or `BF.INFO`
    name: String,

    /// First fixed argument (usually the key)
    first: Option<String>,

    /// Second fixed argument (usually a path or subcommand operand)
    second: Option<String>,

    /// Flattened variadic arguments
    tail: ArgTail,

    /// Token index of the first key, counting the name as 0
    first_key_pos: usize,

    /// Server-side wait of a blocking command
    read_timeout: Option<Duration>,
}

impl Command {
    /// Command with no fixed leading arguments
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Result<Self> {
        Ok(Self::from_parts(name, None, None, flatten(args)?))
    }

    /// Command with one fixed leading argument
    pub fn with_key(name: impl Into<String>, key: impl Into<String>, args: Vec<Arg>) -> Result<Self> {
        Ok(Self::from_parts(name, Some(key.into()), None, flatten(args)?))
    }

    /// Command with two fixed leading arguments
    pub fn with_keys(
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
        args: Vec<Arg>,
    ) -> Result<Self> {
        Ok(Self::from_parts(
            name,
            Some(first.into()),
            Some(second.into()),
            flatten(args)?,
        ))
    }

    /// Assemble a command from an already flattened tail
    pub fn from_parts(
        name: impl Into<String>,
        first: Option<String>,
        second: Option<String>,
        tail: ArgTail,
    ) -> Self {
        Self {
            name: name.into(),
            first,
            second,
            tail,
            first_key_pos: DEFAULT_FIRST_KEY_POS,
            read_timeout: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_arg(&self) -> Option<&str> {
        self.first.as_deref()
    }

    pub fn second_arg(&self) -> Option<&str> {
        self.second.as_deref()
    }

    pub fn tail(&self) -> &ArgTail {
        &self.tail
    }

    /// Number of tokens on the wire, name included
    pub fn len(&self) -> usize {
        1 + self.first.is_some() as usize + self.second.is_some() as usize + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every token of the command in wire order, name first
    pub fn args(&self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.len());
        tokens.push(Token::Text(self.name.clone()));
        tokens.extend(self.first.iter().map(Token::from));
        tokens.extend(self.second.iter().map(Token::from));
        tokens.extend(self.tail.to_tokens());
        tokens
    }

    /// Wire bytes of the token at `index` (0 is the name)
    pub fn arg_bytes(&self, index: usize) -> Option<Vec<u8>> {
        let mut fixed = std::iter::once(Some(self.name.as_str()))
            .chain([self.first.as_deref(), self.second.as_deref()])
            .flatten();
        let fixed_len = self.len() - self.tail.len();

        if index < fixed_len {
            return fixed.nth(index).map(|s| s.as_bytes().to_vec());
        }
        self.tail.wire_bytes(index - fixed_len)
    }

    // =========================================================================
    // Addressing
    // =========================================================================

    pub fn first_key_pos(&self) -> usize {
        self.first_key_pos
    }

    pub fn set_first_key_pos(&mut self, pos: usize) {
        self.first_key_pos = pos;
    }

    /// Wire bytes of the first key, if the command has one
    pub fn first_key(&self) -> Option<Vec<u8>> {
        self.arg_bytes(self.first_key_pos)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Declare the server-side wait of a blocking command
    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = Some(timeout);
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for fixed in [&self.first, &self.second].into_iter().flatten() {
            write!(f, " {}", fixed)?;
        }
        match &self.tail {
            ArgTail::Tokens(tokens) => {
                for token in tokens {
                    write!(f, " {}", token)?;
                }
            }
            ArgTail::Strings(strings) => {
                for s in strings {
                    write!(f, " {}", s)?;
                }
            }
        }
        Ok(())
    }
}
