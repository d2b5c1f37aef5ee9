//! Struct Tag Projector
//!
//! Turns a tagged record into ordered `(name, value)` token pairs.
//!
//! ## Tag Grammar
//! ```text
//! name[,modifier[,modifier...]]
//! ```
//! - `-` or an empty name: the field is never emitted
//! - `omitempty`: the field is dropped while it holds its zero value
//!
//! Records opt in by implementing [`Project`], usually through
//! [`impl_project!`](crate::impl_project). Fields are visited in
//! declaration order and that order is kept on the wire.

use std::net::IpAddr;
use std::time::{Duration, SystemTime};

use bytes::Bytes;

use super::Token;

/// Modifier that suppresses a field holding its zero value
pub const SKIP_IF_DEFAULT: &str = "omitempty";

/// Name that suppresses a field unconditionally
pub const IGNORE: &str = "-";

/// A record that can be flattened into tagged fields
pub trait Project {
    /// Offer every field, in declaration order, to the sink
    fn project_fields(&self, sink: &mut FieldSink);
}

impl<T: Project + ?Sized> Project for &T {
    fn project_fields(&self, sink: &mut FieldSink) {
        (**self).project_fields(sink)
    }
}

impl<T: Project + ?Sized> Project for Box<T> {
    fn project_fields(&self, sink: &mut FieldSink) {
        (**self).project_fields(sink)
    }
}

/// One emitted field of a projected record
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedField {
    /// Wire name taken from the tag
    pub name: &'static str,

    /// Current field value
    pub value: Token,

    /// Whether the tag carried the skip-if-default modifier
    pub skip_if_default: bool,
}

/// Parsed form of a field tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag<'a> {
    pub name: &'a str,
    pub skip_if_default: bool,
}

impl<'a> FieldTag<'a> {
    /// Parse a tag; `None` means the field is never emitted
    pub fn parse(tag: &'a str) -> Option<Self> {
        let (name, modifiers) = match tag.split_once(',') {
            Some((name, rest)) => (name, rest),
            None => (tag, ""),
        };
        if name.is_empty() || name == IGNORE {
            return None;
        }

        let skip_if_default = modifiers
            .split(',')
            .any(|modifier| modifier == SKIP_IF_DEFAULT);

        Some(Self {
            name,
            skip_if_default,
        })
    }
}

/// Collects the fields a record offers, applying tag rules
#[derive(Debug, Default)]
pub struct FieldSink {
    fields: Vec<TaggedField>,
}

impl FieldSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one field under its tag
    pub fn field<V: FieldValue + ?Sized>(&mut self, tag: &'static str, value: &V) {
        let Some(tag) = FieldTag::parse(tag) else {
            return;
        };
        if tag.skip_if_default && value.is_default() {
            return;
        }
        self.fields.push(TaggedField {
            name: tag.name,
            value: value.to_token(),
            skip_if_default: tag.skip_if_default,
        });
    }

    pub fn into_fields(self) -> Vec<TaggedField> {
        self.fields
    }
}

/// Project a record into its emitted fields
pub fn project<T: Project + ?Sized>(record: &T) -> Vec<TaggedField> {
    let mut sink = FieldSink::new();
    record.project_fields(&mut sink);
    sink.into_fields()
}

/// Project a record straight into `out` as name/value token pairs
pub fn project_into<T: Project + ?Sized>(record: &T, out: &mut Vec<Token>) {
    for field in project(record) {
        out.push(Token::Text(field.name.to_string()));
        out.push(field.value);
    }
}

// =============================================================================
// Field Values
// =============================================================================

/// A value that can sit in a tagged field
pub trait FieldValue {
    /// Whether this is the type's zero/empty value
    fn is_default(&self) -> bool;

    fn to_token(&self) -> Token;
}

macro_rules! numeric_field {
    ($($t:ty),*) => {
        $(
            impl FieldValue for $t {
                fn is_default(&self) -> bool {
                    *self == (0 as $t)
                }

                fn to_token(&self) -> Token {
                    Token::from(*self)
                }
            }
        )*
    };
}

numeric_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl FieldValue for bool {
    fn is_default(&self) -> bool {
        !*self
    }

    fn to_token(&self) -> Token {
        Token::from(*self)
    }
}

impl FieldValue for str {
    fn is_default(&self) -> bool {
        self.is_empty()
    }

    fn to_token(&self) -> Token {
        Token::from(self)
    }
}

impl FieldValue for String {
    fn is_default(&self) -> bool {
        self.is_empty()
    }

    fn to_token(&self) -> Token {
        Token::from(self)
    }
}

impl FieldValue for Bytes {
    fn is_default(&self) -> bool {
        self.is_empty()
    }

    fn to_token(&self) -> Token {
        Token::Bytes(self.clone())
    }
}

impl FieldValue for Vec<u8> {
    fn is_default(&self) -> bool {
        self.is_empty()
    }

    fn to_token(&self) -> Token {
        Token::from(self.as_slice())
    }
}

impl FieldValue for Duration {
    fn is_default(&self) -> bool {
        self.is_zero()
    }

    fn to_token(&self) -> Token {
        Token::from(*self)
    }
}

impl FieldValue for IpAddr {
    fn is_default(&self) -> bool {
        false
    }

    fn to_token(&self) -> Token {
        Token::Ip(*self)
    }
}

impl FieldValue for SystemTime {
    fn is_default(&self) -> bool {
        false
    }

    fn to_token(&self) -> Token {
        Token::from(*self)
    }
}

/// An absent optional is the zero value; if it is emitted anyway it is
/// written as an empty string
impl<T: FieldValue> FieldValue for Option<T> {
    fn is_default(&self) -> bool {
        self.is_none()
    }

    fn to_token(&self) -> Token {
        match self {
            Some(value) => value.to_token(),
            None => Token::Text(String::new()),
        }
    }
}

impl<T: FieldValue + ?Sized> FieldValue for &T {
    fn is_default(&self) -> bool {
        (**self).is_default()
    }

    fn to_token(&self) -> Token {
        (**self).to_token()
    }
}

/// Implement [`Project`] for a struct from a field/tag list
///
/// ```
/// use kvwire::impl_project;
///
/// struct Profile {
///     name: String,
///     age: i64,
///     cache: Vec<u8>,
/// }
///
/// impl_project!(Profile {
///     name => "name",
///     age => "age,omitempty",
///     cache => "-",
/// });
/// ```
#[macro_export]
macro_rules! impl_project {
    ($ty:ty { $($field:ident => $tag:literal),* $(,)? }) => {
        impl $crate::args::Project for $ty {
            fn project_fields(&self, sink: &mut $crate::args::FieldSink) {
                $( sink.field($tag, &self.$field); )*
            }
        }
    };
}
