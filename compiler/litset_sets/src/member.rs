//! Members as stored in a built set and as declared in a definition body.

use litset_ir::{LiteralValue, Span, TypeTag};

/// One name/value pair of a literal set.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LiteralMember {
    pub name: String,
    pub value: LiteralValue,
}

impl LiteralMember {
    pub fn new(name: impl Into<String>, value: impl Into<LiteralValue>) -> Self {
        LiteralMember {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Derived from the value, never stored separately.
    #[inline]
    pub fn tag(&self) -> TypeTag {
        self.value.tag()
    }
}

/// A member as written in a definition body, with its source location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeclaredMember {
    pub member: LiteralMember,
    pub span: Span,
}

impl DeclaredMember {
    pub fn new(member: LiteralMember, span: Span) -> Self {
        DeclaredMember { member, span }
    }

    /// A member with no source location, for programmatic definitions.
    pub fn detached(name: impl Into<String>, value: impl Into<LiteralValue>) -> Self {
        DeclaredMember {
            member: LiteralMember::new(name, value),
            span: Span::DUMMY,
        }
    }
}
