//! The immutable member table.

use std::fmt;

use litset_ir::LiteralValue;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::member::LiteralMember;

/// One distinct `(value, tag)` pair and every name declared for it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UniqueValue {
    pub value: LiteralValue,
    /// Indices into `LiteralSet::members`; the first is canonical.
    names: SmallVec<[u32; 1]>,
}

impl UniqueValue {
    /// Index of the first member declared with this value.
    pub fn canonical_index(&self) -> usize {
        self.names.first().map_or(0, |&i| i as usize)
    }

    pub fn name_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.names.iter().map(|&i| i as usize)
    }

    pub fn alias_count(&self) -> usize {
        self.names.len().saturating_sub(1)
    }
}

/// A built literal set.
///
/// `members` keeps declaration order including aliases (base members
/// first when extending). `unique` keeps first-seen order of distinct
/// values. Equality is strict: the value's variant is its type tag.
///
/// Never mutated after construction; a redefinition builds a new set.
#[derive(Clone, Debug)]
pub struct LiteralSet {
    name: String,
    base: Option<String>,
    allow_aliases: bool,
    call_to_validate: bool,
    members: Vec<LiteralMember>,
    unique: Vec<UniqueValue>,
    by_value: FxHashMap<LiteralValue, u32>,
    by_name: FxHashMap<String, u32>,
}

impl LiteralSet {
    /// Index an already validated member list. Aliases are always indexed;
    /// policy checks happen before this point.
    pub(crate) fn assemble(
        name: String,
        base: Option<String>,
        allow_aliases: bool,
        call_to_validate: bool,
        members: Vec<LiteralMember>,
    ) -> Self {
        let mut unique: Vec<UniqueValue> = Vec::new();
        let mut by_value = FxHashMap::default();
        let mut by_name = FxHashMap::default();

        for (index, member) in members.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let index = index as u32;
            by_name.entry(member.name.clone()).or_insert(index);
            match by_value.get(&member.value) {
                Some(&slot) => {
                    if let Some(entry) = unique.get_mut(slot as usize) {
                        entry.names.push(index);
                    }
                }
                None => {
                    #[allow(clippy::cast_possible_truncation)]
                    let slot = unique.len() as u32;
                    by_value.insert(member.value.clone(), slot);
                    unique.push(UniqueValue {
                        value: member.value.clone(),
                        names: smallvec::smallvec![index],
                    });
                }
            }
        }

        LiteralSet {
            name,
            base,
            allow_aliases,
            call_to_validate,
            members,
            unique,
            by_value,
            by_name,
        }
    }

    /// An empty root set, as the marker class itself.
    pub fn root(name: impl Into<String>) -> Self {
        LiteralSet::assemble(name.into(), None, true, false, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the set this one extends or subclasses, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn allow_aliases(&self) -> bool {
        self.allow_aliases
    }

    pub fn call_to_validate(&self) -> bool {
        self.call_to_validate
    }

    /// Every member in declaration order, aliases included.
    pub fn members(&self) -> &[LiteralMember] {
        &self.members
    }

    /// Distinct values in first-seen order.
    pub fn unique(&self) -> &[UniqueValue] {
        &self.unique
    }

    pub fn unique_values(&self) -> impl DoubleEndedIterator<Item = &LiteralValue> + ExactSizeIterator {
        self.unique.iter().map(|u| &u.value)
    }

    pub fn member(&self, name: &str) -> Option<&LiteralMember> {
        self.by_name
            .get(name)
            .and_then(|&i| self.members.get(i as usize))
    }

    pub fn contains(&self, value: &LiteralValue) -> bool {
        self.by_value.contains_key(value)
    }

    /// Position of `value` among the unique values.
    pub fn position(&self, value: &LiteralValue) -> Option<usize> {
        self.by_value.get(value).map(|&slot| slot as usize)
    }

    /// The first member declared with `value`.
    pub fn canonical_member(&self, value: &LiteralValue) -> Option<&LiteralMember> {
        let entry = self.unique.get(self.position(value)?)?;
        self.members.get(entry.canonical_index())
    }

    /// Every member declared with `value`, canonical first.
    pub fn members_for(&self, value: &LiteralValue) -> Vec<&LiteralMember> {
        self.position(value)
            .and_then(|slot| self.unique.get(slot))
            .map(|entry| {
                entry
                    .name_indices()
                    .filter_map(|i| self.members.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.unique.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unique.is_empty()
    }

    pub fn has_aliases(&self) -> bool {
        self.members.len() > self.unique.len()
    }
}

impl PartialEq for LiteralSet {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.base == other.base
            && self.allow_aliases == other.allow_aliases
            && self.call_to_validate == other.call_to_validate
            && self.members == other.members
    }
}

impl Eq for LiteralSet {}

/// `<LiteralEnum 'HttpMethod' [GET="GET", POST="POST"]>`
impl fmt::Display for LiteralSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<LiteralEnum '{}'", self.name)?;
        if !self.members.is_empty() {
            f.write_str(" [")?;
            for (i, member) in self.members.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}={}", member.name, member.value)?;
            }
            f.write_str("]")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests;
