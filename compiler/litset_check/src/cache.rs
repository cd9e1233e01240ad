//! Shared table of built sets.
//!
//! One entry per set-defining symbol, keyed by `(module, name)` and
//! stamped with a fingerprint of the defining source. An entry is
//! `Building` between `declare` and `complete`; occurrences that hit it
//! in that state defer. Once `Built`, the `Arc<LiteralSet>` is never
//! touched again: a rebuild swaps in a fresh one.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use litset_sets::{AliasScope, DefinitionError, LiteralSet};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

/// Identity of a set-defining symbol.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SetKey {
    pub module: String,
    pub name: String,
}

impl SetKey {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        SetKey {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Parse the `module.Name` form written by `Display`.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (module, name) = qualified.rsplit_once('.')?;
        if module.is_empty() || name.is_empty() {
            return None;
        }
        Some(SetKey::new(module, name))
    }
}

impl fmt::Display for SetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

#[derive(Clone, Debug)]
pub enum SetState {
    /// Declared, not yet built. `stale` is the previous build, reused if
    /// the fingerprint comes out unchanged.
    Building {
        stale: Option<(u64, Arc<LiteralSet>)>,
    },
    Built(Arc<LiteralSet>),
    /// Building failed; the error was reported where it happened.
    Failed,
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub fingerprint: u64,
    pub state: SetState,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

#[derive(Debug, Default)]
struct Inner {
    entries: FxHashMap<SetKey, CacheEntry>,
    stats: CacheStats,
}

/// Thread-safe set table shared by every module of a session.
#[derive(Debug, Default)]
pub struct SetCache {
    inner: RwLock<Inner>,
}

impl SetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as being (re)built.
    pub fn declare(&self, key: &SetKey) {
        let mut inner = self.inner.write();
        let stale = match inner.entries.get(key) {
            Some(CacheEntry {
                fingerprint,
                state: SetState::Built(set),
            }) => Some((*fingerprint, Arc::clone(set))),
            Some(CacheEntry {
                state: SetState::Building { stale },
                ..
            }) => stale.clone(),
            _ => None,
        };
        inner.entries.insert(
            key.clone(),
            CacheEntry {
                fingerprint: 0,
                state: SetState::Building { stale },
            },
        );
    }

    /// Finish building `key`.
    ///
    /// When the stale build carries the same fingerprint it is kept and
    /// `build` is never called. The lock is not held while building.
    pub fn complete(
        &self,
        key: &SetKey,
        fingerprint: u64,
        build: impl FnOnce() -> Result<LiteralSet, DefinitionError>,
    ) -> Result<Arc<LiteralSet>, DefinitionError> {
        let reusable = match self.inner.read().entries.get(key) {
            Some(CacheEntry {
                state:
                    SetState::Building {
                        stale: Some((previous, set)),
                    },
                ..
            }) if *previous == fingerprint => Some(Arc::clone(set)),
            _ => None,
        };

        let result = match reusable {
            Some(set) => {
                tracing::debug!(set = %key, "set cache hit");
                self.inner.write().stats.hits += 1;
                Ok(set)
            }
            None => {
                tracing::debug!(set = %key, "set cache miss");
                self.inner.write().stats.misses += 1;
                build().map(Arc::new)
            }
        };

        let state = match &result {
            Ok(set) => SetState::Built(Arc::clone(set)),
            Err(_) => SetState::Failed,
        };
        self.inner
            .write()
            .entries
            .insert(key.clone(), CacheEntry { fingerprint, state });
        result
    }

    /// Give up on `key` without building it.
    pub fn fail(&self, key: &SetKey) {
        self.inner.write().entries.insert(
            key.clone(),
            CacheEntry {
                fingerprint: 0,
                state: SetState::Failed,
            },
        );
    }

    /// Store an already built set (from a persisted table).
    pub fn insert_built(&self, key: SetKey, fingerprint: u64, set: Arc<LiteralSet>) {
        self.inner.write().entries.insert(
            key,
            CacheEntry {
                fingerprint,
                state: SetState::Built(set),
            },
        );
    }

    pub fn entry(&self, key: &SetKey) -> Option<CacheEntry> {
        self.inner.read().entries.get(key).cloned()
    }

    pub fn built(&self, key: &SetKey) -> Option<Arc<LiteralSet>> {
        match self.inner.read().entries.get(key) {
            Some(CacheEntry {
                state: SetState::Built(set),
                ..
            }) => Some(Arc::clone(set)),
            _ => None,
        }
    }

    pub fn contains(&self, key: &SetKey) -> bool {
        self.inner.read().entries.contains_key(key)
    }

    /// Drop one entry. Returns whether it existed.
    pub fn invalidate(&self, key: &SetKey) -> bool {
        self.inner.write().entries.remove(key).is_some()
    }

    /// Drop every entry of `module` that `keep` rejects. Returns how many
    /// were removed.
    pub fn retain_module(&self, module: &str, keep: impl Fn(&SetKey) -> bool) -> usize {
        let mut inner = self.inner.write();
        let before = inner.entries.len();
        inner
            .entries
            .retain(|key, _| key.module != module || keep(key));
        let removed = before - inner.entries.len();
        if removed > 0 {
            tracing::debug!(module, removed, "invalidated removed definitions");
        }
        removed
    }

    /// Every built set with its fingerprint, ordered by key.
    pub fn built_entries(&self) -> Vec<(SetKey, u64, Arc<LiteralSet>)> {
        let inner = self.inner.read();
        let mut out: Vec<_> = inner
            .entries
            .iter()
            .filter_map(|(key, entry)| match &entry.state {
                SetState::Built(set) => Some((key.clone(), entry.fingerprint, Arc::clone(set))),
                SetState::Building { .. } | SetState::Failed => None,
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

/// Fingerprint of one definition: its module, its source text, the
/// fingerprints of its bases in order, and the alias policy it was built
/// under. Stable across runs.
pub fn fingerprint(module: &str, source: &str, bases: &[u64], alias_scope: AliasScope) -> u64 {
    let mut hasher = FxHasher::default();
    module.hash(&mut hasher);
    source.hash(&mut hasher);
    bases.hash(&mut hasher);
    matches!(alias_scope, AliasScope::IncludingInherited).hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
