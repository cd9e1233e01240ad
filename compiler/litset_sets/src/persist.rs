//! Flat persisted form of built sets.
//!
//! A set is stored as its header plus ordered `(name, value, tag)`
//! triples and encoded with bincode. Decoding re-checks every tag against
//! its value and rebuilds the indexes, so a reloaded set is
//! indistinguishable from a freshly built one.

use litset_ir::{LiteralValue, TypeTag};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::member::LiteralMember;
use crate::set::LiteralSet;

/// Bumped whenever the encoded layout changes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    pub value: LiteralValue,
    pub tag: TypeTag,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PersistedSet {
    pub name: String,
    pub base: Option<String>,
    pub allow_aliases: bool,
    pub call_to_validate: bool,
    pub members: Vec<MemberRecord>,
}

/// Versioned collection of sets, keyed by whatever the host stores
/// alongside (module path, source fingerprint).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PersistedTable {
    pub version: u32,
    pub entries: Vec<(String, u64, PersistedSet)>,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("serialization error: {0}")]
    Encode(String),

    #[error("deserialization error: {0}")]
    Decode(String),

    #[error("cache format version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("member '{set}.{member}' is tagged {tag} but holds a {found} value")]
    TagMismatch {
        set: String,
        member: String,
        tag: TypeTag,
        found: TypeTag,
    },

    #[error("member '{set}.{member}' appears more than once")]
    DuplicateName { set: String, member: String },

    #[error("'{set}' disallows aliases but stores '{member}' as an alias")]
    ForbiddenAlias { set: String, member: String },
}

impl From<&LiteralSet> for PersistedSet {
    fn from(set: &LiteralSet) -> Self {
        PersistedSet {
            name: set.name().to_owned(),
            base: set.base().map(str::to_owned),
            allow_aliases: set.allow_aliases(),
            call_to_validate: set.call_to_validate(),
            members: set
                .members()
                .iter()
                .map(|m| MemberRecord {
                    name: m.name.clone(),
                    value: m.value.clone(),
                    tag: m.tag(),
                })
                .collect(),
        }
    }
}

impl PersistedSet {
    /// The `(name, value, tag)` triples in declaration order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &LiteralValue, TypeTag)> {
        self.members
            .iter()
            .map(|r| (r.name.as_str(), &r.value, r.tag))
    }

    pub fn into_set(self) -> Result<LiteralSet, PersistError> {
        let mut names = FxHashSet::default();
        let mut values = FxHashSet::default();
        let mut members = Vec::with_capacity(self.members.len());
        for record in self.members {
            if record.value.tag() != record.tag {
                return Err(PersistError::TagMismatch {
                    set: self.name,
                    member: record.name,
                    tag: record.tag,
                    found: record.value.tag(),
                });
            }
            if !names.insert(record.name.clone()) {
                return Err(PersistError::DuplicateName {
                    set: self.name,
                    member: record.name,
                });
            }
            // Inherited aliases can legitimately survive into a set that
            // disallows new ones, so only a base-less set is checked.
            if !values.insert(record.value.clone()) && !self.allow_aliases && self.base.is_none() {
                return Err(PersistError::ForbiddenAlias {
                    set: self.name,
                    member: record.name,
                });
            }
            members.push(LiteralMember {
                name: record.name,
                value: record.value,
            });
        }
        Ok(LiteralSet::assemble(
            self.name,
            self.base,
            self.allow_aliases,
            self.call_to_validate,
            members,
        ))
    }
}

impl Default for PersistedTable {
    fn default() -> Self {
        PersistedTable::new()
    }
}

impl PersistedTable {
    pub fn new() -> Self {
        PersistedTable {
            version: FORMAT_VERSION,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, fingerprint: u64, set: &LiteralSet) {
        self.entries.push((key.into(), fingerprint, PersistedSet::from(set)));
    }

    pub fn encode(&self) -> Result<Vec<u8>, PersistError> {
        bincode::serialize(self).map_err(|e| PersistError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PersistError> {
        let table: PersistedTable =
            bincode::deserialize(bytes).map_err(|e| PersistError::Decode(e.to_string()))?;
        if table.version != FORMAT_VERSION {
            return Err(PersistError::Version {
                found: table.version,
                expected: FORMAT_VERSION,
            });
        }
        tracing::debug!(entries = table.entries.len(), "decoded persisted sets");
        Ok(table)
    }
}
