//! Resolving occurrences that name a set.

use litset_diagnostic::{Diagnostic, ErrorCode};
use litset_ir::{ExprId, ExprKind, Span};
use litset_types::{Idx, Occurrence, OccurrenceShape, Rejection, Resolution, Role, SetLookup};

use super::{well_known, ModuleChecker};
use crate::cache::SetState;

/// What an occurrence asks of its set.
enum Request<'n> {
    Bare,
    Member(&'n str),
    Construct,
    Validate,
    Predicate,
}

impl ModuleChecker<'_> {
    pub(super) fn resolve_occurrence(&mut self, occurrence: &Occurrence) {
        let Some(path) = self.arena.dotted_path(occurrence.expr) else {
            return;
        };
        let Some((key, consumed)) = self.resolve_set_path(&path) else {
            return;
        };
        let set = match self.cache.entry(&key).map(|entry| entry.state) {
            Some(SetState::Built(set)) => set,
            Some(SetState::Building { .. }) => {
                // Never guess a member table that is not final.
                tracing::debug!(set = %key, "occurrence of an unfinished set left unresolved");
                return;
            }
            Some(SetState::Failed) | None => return,
        };

        if let Role::InstanceCheck { call } = occurrence.role {
            let callee = self.callee_name(call).unwrap_or("isinstance");
            self.report(
                Diagnostic::error(ErrorCode::E3004)
                    .with_message(format!(
                        "{callee}() is not supported for LiteralEnum subclass '{}'; \
                         LiteralEnum values are plain literals, not class instances",
                        set.name()
                    ))
                    .with_label(occurrence.span, "literal set used as a class")
                    .with_suggestion(format!(
                        "use `{0}.is_valid(value)` or `value in {0}`",
                        set.name()
                    )),
            );
            self.expr_types.insert(call, Idx::BOOL);
            return;
        }

        let call = match occurrence.role {
            Role::Callee { call } => Some(call),
            Role::Plain | Role::InstanceCheck { .. } => None,
        };
        let rest: Vec<&'static str> = path[consumed..].iter().map(|&s| self.name(s)).collect();
        let (request, target) = match (rest.as_slice(), call) {
            ([], Some(call)) => (Request::Construct, call),
            ([], None) => (Request::Bare, occurrence.expr),
            ([first, ..], _) if set.member(first).is_some() => {
                (Request::Member(*first), self.prefix(occurrence.expr, rest.len() - 1))
            }
            (["validate"], Some(call)) => (Request::Validate, call),
            ([method], Some(call)) if well_known::is_predicate(method) => (Request::Predicate, call),
            ([first, ..], _) if well_known::NAMESPACE_METHODS.contains(first) => return,
            ([first, ..], _) => (Request::Member(*first), self.prefix(occurrence.expr, rest.len() - 1)),
        };

        let args: Vec<(Idx, Span)> = match (&request, call) {
            (Request::Construct | Request::Validate, Some(call)) => self.call_arguments(call),
            _ => Vec::new(),
        };
        let arg_types: Vec<Idx> = args.iter().map(|&(ty, _)| ty).collect();
        let shape = match request {
            Request::Bare => OccurrenceShape::Bare,
            Request::Member(name) => OccurrenceShape::Member(name),
            Request::Construct => OccurrenceShape::Construct(&arg_types),
            Request::Validate => OccurrenceShape::Validate(&arg_types),
            Request::Predicate => OccurrenceShape::Predicate,
        };
        let is_bare_value = matches!(shape, OccurrenceShape::Bare) && !occurrence.context.is_type();

        let resolution = self.resolver.resolve(
            &mut self.pool,
            SetLookup::Built(&set),
            &occurrence.context,
            shape,
        );
        let target_span = self.arena.span(target);
        match resolution {
            Resolution::Type(ty) => {
                if is_bare_value {
                    let elements = self.resolver.set_type(&mut self.pool, &set);
                    self.set_elements.insert(ty, elements);
                }
                self.expr_types.insert(target, ty);
                self.record_occurrence(target_span, ty);
            }
            Resolution::Rejected(rejection) => {
                let span = match &rejection {
                    Rejection::NotAMember { .. }
                    | Rejection::Disjoint { .. }
                    | Rejection::BroadArgument { .. } => {
                        args.first().map_or(target_span, |&(_, span)| span)
                    }
                    Rejection::UnknownMember { .. }
                    | Rejection::NotCallable { .. }
                    | Rejection::Arity { .. } => target_span,
                };
                self.report(rejection.to_diagnostic(span));
                self.expr_types.insert(target, Idx::UNKNOWN);
            }
            Resolution::Deferred | Resolution::NotApplicable => {}
        }
    }

    /// Types and spans of a call's arguments.
    fn call_arguments(&mut self, call: ExprId) -> Vec<(Idx, Span)> {
        let ExprKind::Call { args, .. } = self.arena.kind(call) else {
            return Vec::new();
        };
        let args = self.arena.args(args).to_vec();
        args.iter()
            .map(|arg| (self.type_of(arg.value), arg.span))
            .collect()
    }

    /// The receiver `depth` attribute accesses below `expr`.
    fn prefix(&self, mut expr: ExprId, depth: usize) -> ExprId {
        for _ in 0..depth {
            match self.arena.kind(expr) {
                ExprKind::Attribute { receiver, .. } => expr = receiver,
                _ => break,
            }
        }
        expr
    }

    fn callee_name(&self, call: ExprId) -> Option<&'static str> {
        let ExprKind::Call { func, .. } = self.arena.kind(call) else {
            return None;
        };
        match self.arena.kind(func) {
            ExprKind::Name(name) => Some(self.name(name)),
            _ => None,
        }
    }
}
