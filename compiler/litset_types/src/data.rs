//! Interned type representation.

use litset_ir::LiteralValue;

use crate::Idx;

/// What an [`Idx`] stands for.
///
/// Compound types hold `Idx` children, so equality of interned types is
/// index equality.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    // Pre-interned, in `Idx` order.
    Str,
    Int,
    Bool,
    Bytes,
    NoneType,
    Object,
    Unknown,
    Never,

    /// Singleton type of one non-`None` literal value.
    Literal(LiteralValue),
    /// Flattened, deduplicated, at least two members, declaration order.
    Union(Box<[Idx]>),
    /// A literal set named in a value position (`x = HttpMethod`).
    SetObject(Box<str>),
    /// Instance of any other named class.
    Instance(Box<str>),
    /// `list[T]`, `dict[K, V]`, `tuple[...]` and other subscripted names.
    Generic { name: Box<str>, args: Box<[Idx]> },
    /// `type[T]`
    ClassOf(Idx),
}

impl TypeData {
    /// Pre-interned entries, indexed by `Idx::raw`.
    pub(crate) const PRIMITIVES: [TypeData; Idx::PRIMITIVE_COUNT as usize] = [
        TypeData::Str,
        TypeData::Int,
        TypeData::Bool,
        TypeData::Bytes,
        TypeData::NoneType,
        TypeData::Object,
        TypeData::Unknown,
        TypeData::Never,
    ];
}
