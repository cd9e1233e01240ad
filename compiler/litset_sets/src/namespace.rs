//! The runtime view of a built set.
//!
//! Values come back exactly as declared: there is no wrapper type, a
//! member of a string set *is* a string.

use std::fmt;
use std::sync::Arc;

use litset_ir::LiteralValue;

use crate::error::{AttributeNotFound, CallError, NotCallable, UnknownValue, ValidationError};
use crate::set::LiteralSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralNamespace {
    set: Arc<LiteralSet>,
}

impl LiteralNamespace {
    pub fn new(set: Arc<LiteralSet>) -> Self {
        LiteralNamespace { set }
    }

    pub fn set(&self) -> &Arc<LiteralSet> {
        &self.set
    }

    pub fn name(&self) -> &str {
        self.set.name()
    }

    /// `Set.NAME`; aliases resolve to their shared value.
    pub fn get(&self, name: &str) -> Result<&LiteralValue, AttributeNotFound> {
        self.set
            .member(name)
            .map(|m| &m.value)
            .ok_or_else(|| AttributeNotFound {
                set: self.set.name().to_owned(),
                name: name.to_owned(),
            })
    }

    /// Returns `candidate` unchanged if it is a member.
    pub fn construct(&self, candidate: &LiteralValue) -> Result<LiteralValue, ValidationError> {
        if self.contains(candidate) {
            return Ok(candidate.clone());
        }
        Err(ValidationError {
            set: self.set.name().to_owned(),
            value: candidate.clone(),
            allowed: self.set.unique_values().cloned().collect(),
        })
    }

    /// Same as `construct`.
    pub fn validate(&self, candidate: &LiteralValue) -> Result<LiteralValue, ValidationError> {
        self.construct(candidate)
    }

    /// `Set(value)`: validates only when the set was defined with
    /// `call_to_validate=True`.
    pub fn call(&self, candidate: &LiteralValue) -> Result<LiteralValue, CallError> {
        if !self.set.call_to_validate() {
            return Err(NotCallable {
                set: self.set.name().to_owned(),
            }
            .into());
        }
        Ok(self.construct(candidate)?)
    }

    /// Strict membership: `True` and `1` are different values.
    pub fn contains(&self, candidate: &LiteralValue) -> bool {
        self.set.contains(candidate)
    }

    /// Same as `contains`.
    pub fn is_valid(&self, candidate: &LiteralValue) -> bool {
        self.contains(candidate)
    }

    /// Unique values in declaration order; reversible.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LiteralValue> + ExactSizeIterator {
        self.set.unique_values()
    }

    /// Every name, aliases included, in declaration order.
    pub fn as_mapping(&self) -> Vec<(&str, &LiteralValue)> {
        self.set
            .members()
            .iter()
            .map(|m| (m.name.as_str(), &m.value))
            .collect()
    }

    /// Canonical names in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        self.items().into_iter().map(|(name, _)| name).collect()
    }

    /// Same as `iter`, collected.
    pub fn values(&self) -> Vec<&LiteralValue> {
        self.iter().collect()
    }

    /// `(canonical name, value)` pairs.
    pub fn items(&self) -> Vec<(&str, &LiteralValue)> {
        self.set
            .unique()
            .iter()
            .filter_map(|u| {
                self.set
                    .members()
                    .get(u.canonical_index())
                    .map(|m| (m.name.as_str(), &u.value))
            })
            .collect()
    }

    /// Same as `items`: canonical names only.
    pub fn unique_mapping(&self) -> Vec<(&str, &LiteralValue)> {
        self.items()
    }

    /// Value to canonical name.
    pub fn name_mapping(&self) -> Vec<(&LiteralValue, &str)> {
        self.items().into_iter().map(|(n, v)| (v, n)).collect()
    }

    /// All names for `value`, canonical first.
    pub fn names(&self, value: &LiteralValue) -> Result<Vec<&str>, UnknownValue> {
        let names: Vec<&str> = self
            .set
            .members_for(value)
            .into_iter()
            .map(|m| m.name.as_str())
            .collect();
        if names.is_empty() {
            return Err(self.unknown(value));
        }
        Ok(names)
    }

    pub fn canonical_name(&self, value: &LiteralValue) -> Result<&str, UnknownValue> {
        self.set
            .canonical_member(value)
            .map(|m| m.name.as_str())
            .ok_or_else(|| self.unknown(value))
    }

    /// Number of unique values.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Whether `other` holds exactly this set's unique values, in any order.
    pub fn matches_values<'v>(&self, other: impl IntoIterator<Item = &'v LiteralValue>) -> bool {
        let mut seen = rustc_hash::FxHashSet::default();
        for value in other {
            if !self.contains(value) {
                return false;
            }
            seen.insert(value);
        }
        seen.len() == self.len()
    }

    fn unknown(&self, value: &LiteralValue) -> UnknownValue {
        UnknownValue {
            set: self.set.name().to_owned(),
            value: value.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a LiteralNamespace {
    type Item = &'a LiteralValue;
    type IntoIter = Box<dyn DoubleEndedIterator<Item = &'a LiteralValue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for LiteralNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.set, f)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
