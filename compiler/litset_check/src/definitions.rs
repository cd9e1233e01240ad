//! Finding the classes that define literal sets.

use litset_ir::{ExprArena, ExprId, Span, StmtKind, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::cache::{SetCache, SetKey};
use crate::config::CheckConfig;
use crate::scope::ModuleScope;
use crate::unit::SourceUnit;

/// How one positional base of a set definition was read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BaseRef {
    /// A configured root marker.
    Root,
    Set { key: SetKey, span: Span },
    /// Anything else (`str`, a mixin); ignored when building.
    Other,
}

/// A class statement that defines a set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SetDefinition {
    pub key: SetKey,
    /// Index into the unit slice.
    pub unit: usize,
    /// Index into the unit's top-level statements.
    pub stmt: usize,
    /// The class name.
    pub span: Span,
    pub bases: Vec<BaseRef>,
}

impl SetDefinition {
    pub fn set_bases(&self) -> impl Iterator<Item = (&SetKey, Span)> {
        self.bases.iter().filter_map(|base| match base {
            BaseRef::Set { key, span } => Some((key, *span)),
            BaseRef::Root | BaseRef::Other => None,
        })
    }
}

/// Every set definition across `units`, in unit then statement order.
///
/// A class is a definition when a base is a root marker or a set, so the
/// search repeats until no new definition turns up. Sets of modules not
/// among `units` count when the cache has them built. A class name bound
/// twice keeps only its last definition.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn collect_definitions(
    units: &[SourceUnit],
    interner: &StringInterner,
    config: &CheckConfig,
    cache: &SetCache,
) -> Vec<SetDefinition> {
    let scopes: Vec<ModuleScope> = units
        .iter()
        .map(|u| ModuleScope::build(&u.module, &u.parsed.module, interner))
        .collect();
    let current: FxHashSet<&str> = units.iter().map(|u| u.module.as_str()).collect();

    let mut found: FxHashMap<(usize, usize), SetDefinition> = FxHashMap::default();
    let mut known: FxHashSet<SetKey> = FxHashSet::default();
    loop {
        let mut progressed = false;
        for (unit_index, unit) in units.iter().enumerate() {
            for (stmt_index, stmt) in unit.parsed.module.body.iter().enumerate() {
                let StmtKind::Class(class) = &stmt.kind else {
                    continue;
                };
                if found.contains_key(&(unit_index, stmt_index)) {
                    continue;
                }
                let is_set = |key: &SetKey| {
                    known.contains(key)
                        || (!current.contains(key.module.as_str()) && cache.built(key).is_some())
                };
                let bases: Vec<BaseRef> = class
                    .bases
                    .iter()
                    .map(|&base| {
                        read_base(&unit.parsed.arena, base, &scopes[unit_index], interner, config, &is_set)
                    })
                    .collect();
                if bases.iter().all(|b| *b == BaseRef::Other) {
                    continue;
                }
                let key = SetKey::new(unit.module.clone(), interner.lookup(class.name));
                tracing::trace!(set = %key, "found set definition");
                known.insert(key.clone());
                found.insert(
                    (unit_index, stmt_index),
                    SetDefinition {
                        key,
                        unit: unit_index,
                        stmt: stmt_index,
                        span: class.name_span,
                        bases,
                    },
                );
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    // A base may have become a set after its class was first seen.
    let is_set = |key: &SetKey| {
        known.contains(key) || (!current.contains(key.module.as_str()) && cache.built(key).is_some())
    };
    for definition in found.values_mut() {
        let unit = &units[definition.unit];
        if let StmtKind::Class(class) = &unit.parsed.module.body[definition.stmt].kind {
            definition.bases = class
                .bases
                .iter()
                .map(|&base| {
                    read_base(&unit.parsed.arena, base, &scopes[definition.unit], interner, config, &is_set)
                })
                .collect();
        }
    }

    let mut definitions: Vec<SetDefinition> = found.into_values().collect();
    definitions.sort_by_key(|d| (d.unit, d.stmt));
    // Last binding of a name wins.
    let mut last: FxHashMap<&SetKey, (usize, usize)> = FxHashMap::default();
    for d in &definitions {
        last.insert(&d.key, (d.unit, d.stmt));
    }
    let keep: FxHashSet<(usize, usize)> = last.into_values().collect();
    definitions.retain(|d| keep.contains(&(d.unit, d.stmt)));
    definitions
}

fn read_base(
    arena: &ExprArena,
    base: ExprId,
    scope: &ModuleScope,
    interner: &StringInterner,
    config: &CheckConfig,
    is_set: &impl Fn(&SetKey) -> bool,
) -> BaseRef {
    let Some(path) = arena.dotted_path(base) else {
        return BaseRef::Other;
    };
    if let Some((key, consumed)) = scope.resolve(&path, interner, is_set) {
        if consumed == path.len() {
            return BaseRef::Set {
                key,
                span: arena.span(base),
            };
        }
    }
    match path.last() {
        Some(&last) if config.is_root_marker(interner.lookup(last)) => BaseRef::Root,
        _ => BaseRef::Other,
    }
}
