//! Scalar literal values.
//!
//! A `LiteralValue` is the only thing a literal set can hold. The enum
//! variant *is* the type tag, so derived `Eq`/`Hash` give strict
//! type-and-value equality: `Bool(true)` and `Int(1)` never collide.

use std::fmt::{self, Write};

/// Kind of a literal value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeTag {
    Str,
    Int,
    Bool,
    Bytes,
    None,
}

impl TypeTag {
    /// Lower-case tag used in persisted tables and JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeTag::Str => "string",
            TypeTag::Int => "integer",
            TypeTag::Bool => "boolean",
            TypeTag::Bytes => "bytes",
            TypeTag::None => "none",
        }
    }

    /// Name of the broad builtin type values of this kind belong to.
    pub const fn base_type_name(self) -> &'static str {
        match self {
            TypeTag::Str => "str",
            TypeTag::Int => "int",
            TypeTag::Bool => "bool",
            TypeTag::Bytes => "bytes",
            TypeTag::None => "None",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statically known scalar value.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Bytes(Vec<u8>),
    /// The absent-value marker.
    None,
}

impl LiteralValue {
    #[inline]
    pub const fn tag(&self) -> TypeTag {
        match self {
            LiteralValue::Str(_) => TypeTag::Str,
            LiteralValue::Int(_) => TypeTag::Int,
            LiteralValue::Bool(_) => TypeTag::Bool,
            LiteralValue::Bytes(_) => TypeTag::Bytes,
            LiteralValue::None => TypeTag::None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, LiteralValue::None)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::Str(s.to_owned())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::Str(s)
    }
}

impl From<i64> for LiteralValue {
    fn from(n: i64) -> Self {
        LiteralValue::Int(n)
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

impl From<&[u8]> for LiteralValue {
    fn from(b: &[u8]) -> Self {
        LiteralValue::Bytes(b.to_vec())
    }
}

/// Renders the value the way it was written: strings double-quoted,
/// byte strings as `b"..."`, booleans as `True`/`False`.
impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Str(s) => {
                f.write_char('"')?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_char('"')
            }
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Bool(true) => f.write_str("True"),
            LiteralValue::Bool(false) => f.write_str("False"),
            LiteralValue::Bytes(bytes) => {
                f.write_str("b\"")?;
                for &b in bytes {
                    match b {
                        b'"' => f.write_str("\\\"")?,
                        b'\\' => f.write_str("\\\\")?,
                        b'\n' => f.write_str("\\n")?,
                        b'\r' => f.write_str("\\r")?,
                        b'\t' => f.write_str("\\t")?,
                        0x20..=0x7e => f.write_char(char::from(b))?,
                        _ => write!(f, "\\x{b:02x}")?,
                    }
                }
                f.write_char('"')
            }
            LiteralValue::None => f.write_str("None"),
        }
    }
}
