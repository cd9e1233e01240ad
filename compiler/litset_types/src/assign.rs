//! Assignability between types.
//!
//! A union accepts anything one of its members accepts, and a union is
//! accepted only if every member is. Together with singleton literals
//! this makes a set's union type accept a raw literal, a named member, or
//! a value already narrowed to a member, while a broad `str` is refused.

use litset_ir::stack::ensure_sufficient_stack;

use crate::{Idx, Pool, TypeData};

impl Pool {
    /// Can a value of type `source` be used where `target` is expected?
    pub fn is_assignable(&self, source: Idx, target: Idx) -> bool {
        if source == target {
            return true;
        }
        if matches!(target, Idx::OBJECT | Idx::UNKNOWN) || matches!(source, Idx::UNKNOWN | Idx::NEVER)
        {
            return true;
        }
        ensure_sufficient_stack(|| self.is_assignable_slow(source, target))
    }

    fn is_assignable_slow(&self, source: Idx, target: Idx) -> bool {
        if let TypeData::Union(members) = self.data(source) {
            return members.iter().all(|&m| self.is_assignable(m, target));
        }
        if let TypeData::Union(members) = self.data(target) {
            return members.iter().any(|&m| self.is_assignable(source, m));
        }
        match (self.data(source), self.data(target)) {
            (TypeData::Literal(value), _) => {
                let base = Idx::for_tag(value.tag());
                base == target || self.is_assignable(base, target)
            }
            // `bool` is a subtype of `int`; their literals stay distinct.
            (TypeData::Bool, TypeData::Int) => true,
            (
                TypeData::Generic { name: a, args: a_args },
                TypeData::Generic { name: b, args: b_args },
            ) => {
                a == b
                    && a_args.len() == b_args.len()
                    && a_args
                        .iter()
                        .zip(b_args.iter())
                        .all(|(&x, &y)| self.is_assignable(x, y))
            }
            (TypeData::ClassOf(a), TypeData::ClassOf(b)) => self.is_assignable(*a, *b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
