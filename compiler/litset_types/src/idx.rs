//! Type handles.
//!
//! Types are compared by index. The primitive types are pre-interned at
//! fixed indices so they can be named without a pool.

use std::fmt;

use litset_ir::TypeTag;

/// A 32-bit index into a [`Pool`](crate::Pool).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    pub const STR: Self = Self(0);
    pub const INT: Self = Self(1);
    pub const BOOL: Self = Self(2);
    pub const BYTES: Self = Self(3);
    /// `None`; also the singleton type of the `None` value.
    pub const NONE: Self = Self(4);
    /// Top type: everything is assignable to it.
    pub const OBJECT: Self = Self(5);
    /// Unknown type (gradual): assignable both ways.
    pub const UNKNOWN: Self = Self(6);
    /// Empty union.
    pub const NEVER: Self = Self(7);

    pub const PRIMITIVE_COUNT: u32 = 8;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    /// The broad builtin type values of `tag` belong to.
    pub const fn for_tag(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Str => Self::STR,
            TypeTag::Int => Self::INT,
            TypeTag::Bool => Self::BOOL,
            TypeTag::Bytes => Self::BYTES,
            TypeTag::None => Self::NONE,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::STR => f.write_str("Idx::STR"),
            Self::INT => f.write_str("Idx::INT"),
            Self::BOOL => f.write_str("Idx::BOOL"),
            Self::BYTES => f.write_str("Idx::BYTES"),
            Self::NONE => f.write_str("Idx::NONE"),
            Self::OBJECT => f.write_str("Idx::OBJECT"),
            Self::UNKNOWN => f.write_str("Idx::UNKNOWN"),
            Self::NEVER => f.write_str("Idx::NEVER"),
            Self(raw) => write!(f, "Idx({raw})"),
        }
    }
}
