//! Per-type properties computed once at interning time.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        /// `str`, `int`, `bool`, `bytes`, `None`.
        const IS_PRIMITIVE = 1 << 0;
        const IS_LITERAL = 1 << 1;
        const IS_UNION = 1 << 2;
        const IS_SET_OBJECT = 1 << 3;
        const IS_GENERIC = 1 << 4;

        /// Denotes only known literal values: a literal, `None`, or a
        /// union of those.
        const ONLY_SINGLETONS = 1 << 8;
        /// Contains `Unknown` somewhere.
        const HAS_UNKNOWN = 1 << 9;
    }
}

impl TypeFlags {
    /// Flags a compound type inherits from its children.
    pub const PROPAGATE_MASK: Self = Self::HAS_UNKNOWN;

    #[inline]
    pub const fn is_singleton_only(self) -> bool {
        self.contains(Self::ONLY_SINGLETONS)
    }

    #[inline]
    pub const fn has_unknown(self) -> bool {
        self.contains(Self::HAS_UNKNOWN)
    }
}
