//! Token definitions
//!
//! A token is one wire-ready argument of a command. Every token is written
//! as a single bulk string; the variant only decides how its bytes are
//! produced.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use serde::Serialize;

use super::units::{format_ms, unix_millis};
use crate::error::{Result, WireError};

/// One atomic unit of an encoded command
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Signed integer, written in decimal
    Int(i64),

    /// Floating point, written in shortest round-trip decimal
    Float(f64),

    /// UTF-8 text
    Text(String),

    /// Opaque bytes, including marshaled values
    Bytes(Bytes),

    /// IP address, written as its raw octets
    Ip(IpAddr),
}

impl Token {
    /// Marshal any serde value into a binary token (bincode encoding)
    pub fn marshal<T: Serialize + ?Sized>(value: &T) -> Result<Token> {
        let encoded = bincode::serialize(value)
            .map_err(|e| WireError::ArgumentShape(format!("cannot marshal value: {}", e)))?;
        Ok(Token::Bytes(Bytes::from(encoded)))
    }

    /// Borrow the text if this is a text token
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Append the wire bytes of this token to `out`
    pub fn append_wire_bytes(&self, out: &mut Vec<u8>) {
        match self {
            Token::Int(n) => out.extend_from_slice(n.to_string().as_bytes()),
            Token::Float(f) => out.extend_from_slice(format_float(*f).as_bytes()),
            Token::Text(s) => out.extend_from_slice(s.as_bytes()),
            Token::Bytes(b) => out.extend_from_slice(b),
            Token::Ip(IpAddr::V4(ip)) => out.extend_from_slice(&ip.octets()),
            Token::Ip(IpAddr::V6(ip)) => out.extend_from_slice(&ip.octets()),
        }
    }
}

/// Floats as the server parses them: `inf`, `-inf`, otherwise the shortest
/// decimal that round-trips
pub(crate) fn format_float(f: f64) -> String {
    if f == f64::INFINITY {
        "inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        f.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{}", format_float(*x)),
            Token::Text(s) => write!(f, "{}", s),
            Token::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Token::Ip(ip) => write!(f, "{}", ip),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

macro_rules! int_token {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Token {
                fn from(n: $t) -> Self {
                    Token::Int(i64::from(n))
                }
            }
        )*
    };
}

int_token!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Token {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Token::Int(n),
            Err(_) => Token::Text(n.to_string()),
        }
    }
}

impl From<usize> for Token {
    fn from(n: usize) -> Self {
        Token::from(n as u64)
    }
}

impl From<isize> for Token {
    fn from(n: isize) -> Self {
        Token::Int(n as i64)
    }
}

impl From<f64> for Token {
    fn from(f: f64) -> Self {
        Token::Float(f)
    }
}

impl From<f32> for Token {
    fn from(f: f32) -> Self {
        Token::Float(f64::from(f))
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Token::Int(if b { 1 } else { 0 })
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Text(s)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Text(s.to_string())
    }
}

impl From<&String> for Token {
    fn from(s: &String) -> Self {
        Token::Text(s.clone())
    }
}

impl From<Bytes> for Token {
    fn from(b: Bytes) -> Self {
        Token::Bytes(b)
    }
}

impl From<Vec<u8>> for Token {
    fn from(b: Vec<u8>) -> Self {
        Token::Bytes(Bytes::from(b))
    }
}

impl From<&[u8]> for Token {
    fn from(b: &[u8]) -> Self {
        Token::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<IpAddr> for Token {
    fn from(ip: IpAddr) -> Self {
        Token::Ip(ip)
    }
}

impl From<Ipv4Addr> for Token {
    fn from(ip: Ipv4Addr) -> Self {
        Token::Ip(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for Token {
    fn from(ip: Ipv6Addr) -> Self {
        Token::Ip(IpAddr::V6(ip))
    }
}

/// Durations travel as whole milliseconds
impl From<Duration> for Token {
    fn from(d: Duration) -> Self {
        Token::Int(format_ms(d))
    }
}

/// Timestamps travel as unix milliseconds
impl From<SystemTime> for Token {
    fn from(t: SystemTime) -> Self {
        Token::Int(unix_millis(t))
    }
}
