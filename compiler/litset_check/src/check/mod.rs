//! Module-level checker for literal-set occurrences.
//!
//! The `ModuleChecker` walks one module after every set it can see has
//! been built, classifies each name-like occurrence, resolves the ones
//! that name a set, and checks the places where a literal-set type meets
//! a value.
//!
//! # Architecture
//!
//! ```text
//! Pass 1: Registration
//!   - Type aliases (`type X = ...`, `X: TypeAlias = ...`)
//!   - Signatures of top-level functions
//!
//! Pass 2: Bodies
//!   - Occurrences in runtime expressions (members, construction,
//!     validation, isinstance)
//!   - Defaults, annotated assignments, returns and calls to module
//!     functions checked against their declared types
//! ```
//!
//! Forward-reference strings are parsed into the checker's own copy of
//! the arena the first time an annotation containing them is visited and
//! classified again as if written in place.
//!
//! Set class bodies are not walked: their contents were consumed when the
//! set was built.

mod annotations;
mod api;
mod bodies;
mod occurrences;
mod signatures;
mod well_known;

use litset_diagnostic::Diagnostic;
use litset_ir::{ExprArena, ExprId, Name, Span, StmtKind, StringInterner};
use litset_types::{Idx, Pool, TypeResolver};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::cache::{SetCache, SetKey};
use crate::scope::ModuleScope;
use crate::unit::SourceUnit;

pub use api::{check_module, CheckedModule, TypedSpan};
use signatures::Signature;

/// A variable binding in the current scope.
#[derive(Copy, Clone, Debug)]
struct Local {
    ty: Idx,
    /// Annotated: later assignments are checked against `ty`.
    declared: bool,
}

pub(crate) struct ModuleChecker<'a> {
    unit: &'a SourceUnit,
    interner: &'a StringInterner,
    cache: &'a SetCache,
    resolver: TypeResolver,
    scope: ModuleScope,
    /// The unit's arena plus parsed forward references.
    arena: ExprArena,
    pool: Pool,

    /// Registered top-level functions by where their name is written.
    functions: FxHashMap<Span, Signature>,
    /// Function name to its last top-level definition.
    signatures: FxHashMap<Name, Span>,
    /// Functions defined inside each enclosing `def` or class body,
    /// innermost last.
    nested: Vec<FxHashMap<Name, Span>>,
    aliases: FxHashMap<Name, Idx>,
    /// Top-level statements handled during registration.
    registered: FxHashSet<usize>,
    scopes: Vec<FxHashMap<Name, Local>>,
    return_type: Option<Idx>,

    expr_types: FxHashMap<ExprId, Idx>,
    /// Set object type to the union its iteration yields.
    set_elements: FxHashMap<Idx, Idx>,
    /// String annotation node to its parsed contents (`None` if invalid).
    forward: FxHashMap<ExprId, Option<ExprId>>,

    diagnostics: Vec<Diagnostic>,
    annotations: Vec<TypedSpan>,
    occurrences: Vec<TypedSpan>,
}

impl<'a> ModuleChecker<'a> {
    pub(crate) fn new(
        unit: &'a SourceUnit,
        interner: &'a StringInterner,
        cache: &'a SetCache,
        resolver: TypeResolver,
    ) -> Self {
        ModuleChecker {
            unit,
            interner,
            cache,
            resolver,
            scope: ModuleScope::build(&unit.module, &unit.parsed.module, interner),
            arena: unit.parsed.arena.clone(),
            pool: Pool::new(),
            functions: FxHashMap::default(),
            signatures: FxHashMap::default(),
            nested: Vec::new(),
            aliases: FxHashMap::default(),
            registered: FxHashSet::default(),
            scopes: vec![FxHashMap::default()],
            return_type: None,
            expr_types: FxHashMap::default(),
            set_elements: FxHashMap::default(),
            forward: FxHashMap::default(),
            diagnostics: Vec::new(),
            annotations: Vec::new(),
            occurrences: Vec::new(),
        }
    }

    /// Run both passes.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %self.unit.module))]
    pub(crate) fn check(&mut self) {
        self.register();
        let unit = self.unit;
        self.check_body(&unit.parsed.module.body, true);
    }

    /// Set named by the leading segments of `path`, with how many
    /// segments it took.
    fn resolve_set_path(&self, path: &[Name]) -> Option<(SetKey, usize)> {
        self.scope
            .resolve(path, self.interner, |key| self.cache.contains(key))
    }

    /// Whether a top-level class statement defines a set.
    fn is_set_class(&self, stmt: &StmtKind) -> bool {
        match stmt {
            StmtKind::Class(class) => self.cache.contains(&SetKey::new(
                self.unit.module.clone(),
                self.interner.lookup(class.name),
            )),
            _ => false,
        }
    }

    fn lookup_local(&self, name: Name) -> Option<Local> {
        self.scopes.iter().rev().find_map(|s| s.get(&name).copied())
    }

    fn bind(&mut self, name: Name, ty: Idx, declared: bool) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, Local { ty, declared });
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn record_occurrence(&mut self, span: Span, ty: Idx) {
        self.occurrences.push(TypedSpan::new(span, self.pool.format_type(ty)));
    }

    fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
