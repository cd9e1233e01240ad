//! Sharded string interner.
//!
//! Identifiers and string literal contents are interned once per session and
//! compared as `Name`s afterwards. Each shard has its own `RwLock`, so files
//! checked in parallel rarely contend.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct InternShard {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(128),
        }
    }
}

/// Error when a shard runs out of local indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                Name::MAX_LOCAL
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Words every session needs: class keywords, typing wrappers, and the
/// builtin scalar type names.
const PRE_INTERNED: &[&str] = &[
    "LiteralEnum",
    "extend",
    "allow_aliases",
    "call_to_validate",
    "_ignore_",
    "validate",
    "is_valid",
    "isinstance",
    "issubclass",
    "Optional",
    "Union",
    "Literal",
    "Final",
    "ClassVar",
    "Annotated",
    "TypeAlias",
    "type",
    "list",
    "dict",
    "set",
    "frozenset",
    "tuple",
    "Sequence",
    "Iterable",
    "Mapping",
    "str",
    "int",
    "bool",
    "bytes",
    "float",
    "object",
    "staticmethod",
    "classmethod",
    "property",
];

/// Sharded string interner for concurrent access.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    total_count: AtomicUsize,
}

impl StringInterner {
    pub fn new() -> Self {
        let interner = Self {
            shards: std::array::from_fn(|_| RwLock::new(InternShard::new())),
            total_count: AtomicUsize::new(0),
        };
        // The empty string must land on `Name::EMPTY`.
        interner.intern("");
        for word in PRE_INTERNED {
            interner.intern(word);
        }
        interner
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        if s.is_empty() {
            return 0;
        }
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Intern `s`, returning an error when its shard is full.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        self.intern_with(s, |s| s.to_owned())
    }

    /// Intern an owned string without copying it again.
    pub fn try_intern_owned(&self, s: String) -> Result<Name, InternError> {
        let key = s.clone();
        self.intern_with(&key, move |_| s)
    }

    fn intern_with(
        &self,
        s: &str,
        to_owned: impl FnOnce(&str) -> String,
    ) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        if let Some(&local) = shard.read().map.get(s) {
            return Ok(Name::new(shard_u32, local));
        }

        let mut guard = shard.write();
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_u32, local));
        }

        let count = guard.strings.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&l| l <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;

        // Interned strings live for the rest of the process.
        let leaked: &'static str = Box::leak(to_owned(s).into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_u32, local))
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics if a shard exceeds 2^28 strings.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Intern an owned string.
    ///
    /// # Panics
    /// Panics if a shard exceeds 2^28 strings.
    pub fn intern_owned(&self, s: String) -> Name {
        self.try_intern_owned(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up an already interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_u32 = shard_idx as u32;
        self.shards[shard_idx]
            .read()
            .map
            .get(s)
            .map(|&local| Name::new(shard_u32, local))
    }

    /// The string behind `name`.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.shards[name.shard()].read();
        guard.strings.get(name.local()).copied().unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// True when only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only access to interned names.
///
/// Lets rendering code accept either a borrowed `StringInterner` or a
/// `SharedInterner` handle.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

impl StringLookup for SharedInterner {
    fn lookup(&self, name: Name) -> &str {
        self.0.lookup(name)
    }
}

/// Reference-counted interner handle shared by a checking session and the
/// worker threads it spawns.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
