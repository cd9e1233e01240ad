//! Annotations: classification, forward references and lowering to
//! pool types.

use litset_diagnostic::{Diagnostic, ErrorCode};
use litset_ir::stack::ensure_sufficient_stack;
use litset_ir::{BinaryOp, ExprId, ExprKind, Name};
use litset_parse::parse_expression_into;
use litset_sets::evaluate_literal;
use litset_types::{Classified, ContextClassifier, ForwardRef, Idx, Site};

use super::{well_known, ModuleChecker, TypedSpan};

impl ModuleChecker<'_> {
    /// Visit an annotation at `site`: resolve the occurrences in it and
    /// return the type it denotes.
    pub(super) fn annotation(&mut self, expr: ExprId, site: Site) -> Idx {
        let classified = ContextClassifier::new(&self.arena, self.interner).annotation(expr, site);
        self.process(classified);
        let ty = self.lower(expr);
        self.annotations
            .push(TypedSpan::new(self.arena.span(expr), self.pool.format_type(ty)));
        ty
    }

    /// Resolve classified occurrences, last first, so the arguments of a
    /// call are typed before the call itself.
    pub(super) fn process(&mut self, classified: Vec<Classified>) {
        for item in classified.into_iter().rev() {
            match item {
                Classified::Occurrence(occurrence) => self.resolve_occurrence(&occurrence),
                Classified::Deferred(reference) => {
                    let Some(parsed) = self.forward_target(&reference) else {
                        continue;
                    };
                    let again = ContextClassifier::new(&self.arena, self.interner)
                        .forward_ref(&reference, parsed);
                    tracing::trace!(
                        text = self.name(reference.text),
                        occurrences = again.len(),
                        "re-classified forward reference"
                    );
                    self.process(again);
                }
            }
        }
    }

    /// Parse a forward reference once; later visits reuse the result.
    fn forward_target(&mut self, reference: &ForwardRef) -> Option<ExprId> {
        if let Some(&parsed) = self.forward.get(&reference.expr) {
            return parsed;
        }
        let text = self.name(reference.text);
        let base = reference.span.start + self.content_offset(reference);
        let parsed = match parse_expression_into(text, base, self.interner, &mut self.arena) {
            Ok(id) => Some(id),
            Err(errors) => {
                let mut diagnostic = Diagnostic::error(ErrorCode::E1006)
                    .with_message(format!("invalid forward reference \"{text}\""))
                    .with_label(reference.span, "not a valid type expression");
                for error in errors {
                    diagnostic = diagnostic.with_note(error.message);
                }
                self.report(diagnostic);
                None
            }
        };
        self.forward.insert(reference.expr, parsed);
        parsed
    }

    /// Bytes between the start of a string literal and its contents
    /// (prefix letters and opening quotes).
    fn content_offset(&self, reference: &ForwardRef) -> u32 {
        let literal = self.unit.text(reference.span);
        let Some(quote) = literal.find(['"', '\'']) else {
            return 0;
        };
        let rest = &literal[quote..];
        let width = if rest.starts_with("\"\"\"") || rest.starts_with("'''") {
            3
        } else {
            1
        };
        u32::try_from(quote + width).unwrap_or(0)
    }

    /// Type denoted by an annotation expression.
    pub(super) fn lower(&mut self, expr: ExprId) -> Idx {
        ensure_sufficient_stack(|| self.lower_inner(expr))
    }

    fn lower_inner(&mut self, expr: ExprId) -> Idx {
        match self.arena.kind(expr) {
            ExprKind::None => Idx::NONE,
            ExprKind::Name(_) | ExprKind::Attribute { .. } => self.lower_path(expr),
            ExprKind::Subscript { value, index } => self.lower_subscript(value, index),
            ExprKind::Binary {
                op: BinaryOp::BitOr,
                left,
                right,
            } => {
                let left = self.lower(left);
                let right = self.lower(right);
                self.pool.union([left, right])
            }
            ExprKind::Str(_) => match self.forward.get(&expr).copied().flatten() {
                Some(parsed) => self.lower(parsed),
                None => Idx::UNKNOWN,
            },
            _ => Idx::UNKNOWN,
        }
    }

    fn lower_path(&mut self, expr: ExprId) -> Idx {
        let Some(path) = self.arena.dotted_path(expr) else {
            return Idx::UNKNOWN;
        };
        if let Some((key, consumed)) = self.resolve_set_path(&path) {
            let Some(set) = self.cache.built(&key) else {
                return Idx::UNKNOWN;
            };
            return match path.get(consumed) {
                None => self.resolver.set_type(&mut self.pool, &set),
                Some(&member) => match set.member(self.name(member)) {
                    Some(member) => self.pool.literal(member.value.clone()),
                    None => Idx::UNKNOWN,
                },
            };
        }
        if let [name] = path[..] {
            if let Some(&alias) = self.aliases.get(&name) {
                return alias;
            }
        }
        let Some(&last) = path.last() else {
            return Idx::UNKNOWN;
        };
        if let Some(builtin) = well_known::builtin_type(self.name(last)) {
            return builtin;
        }
        let joined = self.join(&path);
        self.pool.instance(&joined)
    }

    fn lower_subscript(&mut self, value: ExprId, index: ExprId) -> Idx {
        let items = self.arena.subscript_items(index);
        let head = self
            .arena
            .dotted_path(value)
            .and_then(|path| path.last().copied())
            .map(|last| self.name(last));
        match head {
            Some("Optional") => {
                let inner = self.lower_first(&items);
                self.pool.optional(inner)
            }
            Some("Union") => {
                let members: Vec<Idx> = items.iter().map(|&item| self.lower(item)).collect();
                self.pool.union(members)
            }
            Some("Literal") => {
                let members: Vec<Idx> = items.iter().map(|&item| self.literal_item(item)).collect();
                self.pool.union(members)
            }
            Some("Annotated" | "Final" | "ClassVar" | "Required" | "NotRequired" | "ReadOnly") => {
                self.lower_first(&items)
            }
            Some("TypeGuard" | "TypeIs") => Idx::BOOL,
            Some("type" | "Type") => {
                let inner = self.lower_first(&items);
                self.pool.class_of(inner)
            }
            Some(name) => {
                let args: Vec<Idx> = items.iter().map(|&item| self.lower(item)).collect();
                self.pool.generic(well_known::generic_name(name), &args)
            }
            None => Idx::UNKNOWN,
        }
    }

    fn lower_first(&mut self, items: &[ExprId]) -> Idx {
        items.first().map_or(Idx::UNKNOWN, |&first| self.lower(first))
    }

    /// One argument of `Literal[...]`: a literal, or a set member.
    fn literal_item(&mut self, item: ExprId) -> Idx {
        if let Ok(value) = evaluate_literal(&self.arena, self.interner, item) {
            return self.pool.literal(value);
        }
        match self.arena.dotted_path(item) {
            Some(path) if path.len() > 1 => self.lower_path(item),
            _ => Idx::UNKNOWN,
        }
    }

    pub(super) fn join(&self, path: &[Name]) -> String {
        path.iter()
            .map(|&segment| self.name(segment))
            .collect::<Vec<_>>()
            .join(".")
    }
}
