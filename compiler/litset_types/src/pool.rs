//! Type pool: interning and construction.

mod format;

use litset_ir::LiteralValue;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{Idx, TypeData, TypeFlags};

static NONE_VALUE: LiteralValue = LiteralValue::None;

/// Interned types for one checking unit.
///
/// Interning the same `TypeData` twice returns the same `Idx`, so type
/// equality is index equality.
pub struct Pool {
    items: Vec<TypeData>,
    flags: Vec<TypeFlags>,
    map: FxHashMap<TypeData, Idx>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    pub fn new() -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(64),
            flags: Vec::with_capacity(64),
            map: FxHashMap::default(),
        };
        for data in TypeData::PRIMITIVES {
            pool.push(data);
        }
        pool
    }

    /// Intern `data`, returning the existing index if already present.
    ///
    /// Use the constructors below for unions: they normalize first.
    pub fn intern(&mut self, data: TypeData) -> Idx {
        if let Some(&idx) = self.map.get(&data) {
            return idx;
        }
        self.push(data)
    }

    fn push(&mut self, data: TypeData) -> Idx {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a checking unit never interns 4 billion types"
        )]
        let idx = Idx::from_raw(self.items.len() as u32);
        let flags = self.compute_flags(&data);
        self.items.push(data.clone());
        self.flags.push(flags);
        self.map.insert(data, idx);
        idx
    }

    fn compute_flags(&self, data: &TypeData) -> TypeFlags {
        match data {
            TypeData::Str | TypeData::Int | TypeData::Bool | TypeData::Bytes => {
                TypeFlags::IS_PRIMITIVE
            }
            TypeData::NoneType => TypeFlags::IS_PRIMITIVE | TypeFlags::ONLY_SINGLETONS,
            TypeData::Unknown => TypeFlags::HAS_UNKNOWN,
            TypeData::Object | TypeData::Never | TypeData::Instance(_) => TypeFlags::empty(),
            TypeData::Literal(_) => TypeFlags::IS_LITERAL | TypeFlags::ONLY_SINGLETONS,
            TypeData::SetObject(_) => TypeFlags::IS_SET_OBJECT,
            TypeData::Union(members) => {
                let mut flags = TypeFlags::IS_UNION | TypeFlags::ONLY_SINGLETONS;
                for &member in members.iter() {
                    let child = self.flags(member);
                    flags |= child & TypeFlags::PROPAGATE_MASK;
                    if !child.is_singleton_only() {
                        flags.remove(TypeFlags::ONLY_SINGLETONS);
                    }
                }
                flags
            }
            TypeData::Generic { args, .. } => args
                .iter()
                .fold(TypeFlags::IS_GENERIC, |acc, &a| {
                    acc | (self.flags(a) & TypeFlags::PROPAGATE_MASK)
                }),
            TypeData::ClassOf(inner) => self.flags(*inner) & TypeFlags::PROPAGATE_MASK,
        }
    }

    #[inline]
    pub fn data(&self, idx: Idx) -> &TypeData {
        &self.items[idx.raw() as usize]
    }

    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.flags[idx.raw() as usize]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // === Constructors ===

    /// Singleton type of `value`. `None` is `Idx::NONE` itself.
    pub fn literal(&mut self, value: LiteralValue) -> Idx {
        match value {
            LiteralValue::None => Idx::NONE,
            value => self.intern(TypeData::Literal(value)),
        }
    }

    /// Normalized union: nested unions are flattened, duplicates dropped
    /// (first occurrence wins), `Never` absorbed. No members gives
    /// `Never`; one member gives that member unwrapped.
    pub fn union(&mut self, members: impl IntoIterator<Item = Idx>) -> Idx {
        let mut flat: SmallVec<[Idx; 8]> = SmallVec::new();
        for member in members {
            match self.data(member) {
                TypeData::Union(inner) => {
                    for &m in inner.iter() {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                TypeData::Never => {}
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        match flat.len() {
            0 => Idx::NEVER,
            1 => flat[0],
            _ => self.intern(TypeData::Union(flat.into_vec().into_boxed_slice())),
        }
    }

    /// `inner | None`
    pub fn optional(&mut self, inner: Idx) -> Idx {
        self.union([inner, Idx::NONE])
    }

    pub fn set_object(&mut self, name: &str) -> Idx {
        self.intern(TypeData::SetObject(name.into()))
    }

    pub fn instance(&mut self, name: &str) -> Idx {
        self.intern(TypeData::Instance(name.into()))
    }

    pub fn generic(&mut self, name: &str, args: &[Idx]) -> Idx {
        self.intern(TypeData::Generic {
            name: name.into(),
            args: args.into(),
        })
    }

    pub fn class_of(&mut self, inner: Idx) -> Idx {
        self.intern(TypeData::ClassOf(inner))
    }

    // === Queries ===

    /// Members of a union, or `idx` alone.
    pub fn union_members(&self, idx: Idx) -> SmallVec<[Idx; 8]> {
        match self.data(idx) {
            TypeData::Union(members) => members.iter().copied().collect(),
            TypeData::Never => SmallVec::new(),
            _ => smallvec::smallvec![idx],
        }
    }

    /// The one value a singleton type denotes.
    pub fn singleton_value(&self, idx: Idx) -> Option<&LiteralValue> {
        match self.data(idx) {
            TypeData::Literal(value) => Some(value),
            TypeData::NoneType => Some(&NONE_VALUE),
            _ => None,
        }
    }

    /// Every value a type denotes, when it only denotes known values.
    pub fn singleton_values(&self, idx: Idx) -> Option<Vec<&LiteralValue>> {
        if !self.flags(idx).is_singleton_only() {
            return None;
        }
        self.union_members(idx)
            .into_iter()
            .map(|m| self.singleton_value(m))
            .collect()
    }
}

#[cfg(test)]
mod tests;
