//! Pass 1: aliases and function signatures.

use litset_ir::{ExprId, ExprKind, Function, Name, ParamKind, StmtKind};
use litset_types::{Idx, Site};

use super::{well_known, ModuleChecker};

#[derive(Clone, Debug)]
pub(crate) struct SignatureParam {
    pub(crate) name: Name,
    pub(crate) kind: ParamKind,
    pub(crate) ty: Idx,
}

/// Declared parameter and return types of a function.
#[derive(Clone, Debug)]
pub(crate) struct Signature {
    pub(crate) params: Vec<SignatureParam>,
    pub(crate) returns: Option<Idx>,
}

impl Signature {
    /// Parameter receiving the `position`th positional argument.
    pub(crate) fn positional(&self, position: usize) -> Option<&SignatureParam> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::Regular)
            .nth(position)
    }

    pub(crate) fn keyword(&self, name: Name) -> Option<&SignatureParam> {
        self.params
            .iter()
            .find(|p| p.kind == ParamKind::Regular && p.name == name)
    }
}

impl ModuleChecker<'_> {
    pub(super) fn register(&mut self) {
        let unit = self.unit;
        for (index, stmt) in unit.parsed.module.body.iter().enumerate() {
            match &stmt.kind {
                StmtKind::TypeAlias { name, value, .. } => {
                    self.register_alias(*name, *value);
                    self.registered.insert(index);
                }
                StmtKind::AnnAssign {
                    target,
                    annotation,
                    value: Some(value),
                } => {
                    if let (ExprKind::Name(name), true) =
                        (self.arena.kind(*target), self.is_alias_annotation(*annotation))
                    {
                        self.register_alias(name, *value);
                        self.registered.insert(index);
                    }
                }
                StmtKind::Function(function) => {
                    let signature = self.signature(function);
                    self.functions.insert(function.name_span, signature);
                    self.signatures.insert(function.name, function.name_span);
                }
                _ => {}
            }
        }
        tracing::debug!(
            aliases = self.aliases.len(),
            functions = self.functions.len(),
            "registered module items"
        );
    }

    pub(super) fn register_alias(&mut self, name: Name, value: ExprId) {
        let ty = self.annotation(value, Site::TypeAlias);
        self.aliases.insert(name, ty);
    }

    pub(super) fn is_alias_annotation(&self, annotation: ExprId) -> bool {
        self.arena
            .dotted_path(annotation)
            .and_then(|path| path.last().copied())
            .is_some_and(|last| well_known::is_alias_marker(self.name(last)))
    }

    /// Visit a function's annotations and collect its declared types.
    pub(super) fn signature(&mut self, function: &Function) -> Signature {
        let params = function
            .params
            .iter()
            .map(|param| SignatureParam {
                name: param.name,
                kind: param.kind,
                ty: param
                    .annotation
                    .map_or(Idx::UNKNOWN, |a| self.annotation(a, Site::Parameter)),
            })
            .collect();
        let returns = function.returns.map(|r| self.annotation(r, Site::Return));
        Signature { params, returns }
    }

    /// The registered signature of `function`, or a fresh one for
    /// functions no scope registered (a `def` under a module-level `if`).
    pub(super) fn signature_for(&mut self, function: &Function) -> Signature {
        match self.functions.get(&function.name_span) {
            Some(signature) => signature.clone(),
            None => self.signature(function),
        }
    }

    /// Record a `def` inside a function or class body in the innermost
    /// enclosing scope, so later calls by name are checked.
    pub(super) fn register_nested(&mut self, function: &Function) {
        if self.nested.is_empty() {
            return;
        }
        if !self.functions.contains_key(&function.name_span) {
            let signature = self.signature(function);
            self.functions.insert(function.name_span, signature);
        }
        if let Some(scope) = self.nested.last_mut() {
            scope.insert(function.name, function.name_span);
        }
    }

    /// Signature of the function a call by `name` reaches: the innermost
    /// enclosing definition first, then the module's.
    pub(super) fn callee_signature(&self, name: Name) -> Option<&Signature> {
        self.nested
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name))
            .or_else(|| self.signatures.get(&name))
            .and_then(|span| self.functions.get(span))
    }
}
