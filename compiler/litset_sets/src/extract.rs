//! Member extraction: from a class body to declared members.
//!
//! A binding is a member iff its name is public (no leading underscore),
//! not listed in `_ignore_`, and its right-hand side is a statically
//! evaluable literal of an allowed kind. Functions, nested classes,
//! decorated callables, and computed values are class infrastructure and
//! are skipped silently. Floats are skipped too but reported, since they
//! look like members and never will be.

use litset_ir::{
    ClassDef, ExprArena, ExprId, ExprKind, LiteralValue, Name, Span, StmtKind, StringInterner,
    UnaryOp,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::build::ExtensionRequest;
use crate::error::DefinitionError;
use crate::member::{DeclaredMember, LiteralMember};

/// One `NAME = expr` binding in a class body.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub name: Name,
    pub name_span: Span,
    pub value: ExprId,
}

/// Why an expression has no static literal value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NotLiteral {
    Float(f64),
    /// Integer outside the signed 64-bit range.
    OutOfRange,
    /// Anything evaluated at runtime: calls, names, containers, f-strings.
    Computed,
}

/// Static value of a literal expression.
///
/// Accepts strings, byte strings, integers (optionally negated), `True`,
/// `False`, and `None`.
pub fn evaluate_literal(
    arena: &ExprArena,
    interner: &StringInterner,
    expr: ExprId,
) -> Result<LiteralValue, NotLiteral> {
    match arena.kind(expr) {
        ExprKind::Str(name) => Ok(LiteralValue::Str(interner.lookup(name).to_owned())),
        ExprKind::Bytes(id) => Ok(LiteralValue::Bytes(arena.bytes(id).to_vec())),
        ExprKind::Int(n) => i64::try_from(n)
            .map(LiteralValue::Int)
            .map_err(|_| NotLiteral::OutOfRange),
        ExprKind::BigInt => Err(NotLiteral::OutOfRange),
        ExprKind::Float(bits) => Err(NotLiteral::Float(f64::from_bits(bits))),
        ExprKind::Bool(b) => Ok(LiteralValue::Bool(b)),
        ExprKind::None => Ok(LiteralValue::None),
        ExprKind::Unary { op, operand } => match (op, arena.kind(operand)) {
            (UnaryOp::Neg, ExprKind::Int(n)) => i64::try_from(-i128::from(n))
                .map(LiteralValue::Int)
                .map_err(|_| NotLiteral::OutOfRange),
            (UnaryOp::Pos, ExprKind::Int(n)) => i64::try_from(n)
                .map(LiteralValue::Int)
                .map_err(|_| NotLiteral::OutOfRange),
            (UnaryOp::Neg | UnaryOp::Pos, ExprKind::BigInt) => Err(NotLiteral::OutOfRange),
            (UnaryOp::Neg, ExprKind::Float(bits)) => Err(NotLiteral::Float(-f64::from_bits(bits))),
            (UnaryOp::Pos, ExprKind::Float(bits)) => Err(NotLiteral::Float(f64::from_bits(bits))),
            _ => Err(NotLiteral::Computed),
        },
        _ => Err(NotLiteral::Computed),
    }
}

/// Every single-name binding in the body, in source order.
///
/// `A = B = "x"` yields two candidates. Annotated assignments with a value
/// count; bare annotations do not bind anything.
pub fn extract_candidates(arena: &ExprArena, class: &ClassDef) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for stmt in &class.body {
        let (targets, value): (&[ExprId], ExprId) = match &stmt.kind {
            StmtKind::Assign { targets, value } => (targets, *value),
            StmtKind::AnnAssign {
                target,
                value: Some(value),
                ..
            } => (std::slice::from_ref(target), *value),
            _ => continue,
        };
        for &target in targets {
            if let ExprKind::Name(name) = arena.kind(target) {
                candidates.push(Candidate {
                    name,
                    name_span: arena.span(target),
                    value,
                });
            }
        }
    }
    candidates
}

/// Why a candidate is not a member.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Exclusion {
    /// Leading underscore (including `_ignore_` itself).
    Private,
    Ignored,
    Computed,
    OutOfRange,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    Member(LiteralValue),
    Excluded(Exclusion),
    /// Member-shaped but float-valued.
    Unsupported(f64),
}

/// Keyword options on the class line.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ClassOptions {
    pub extend: bool,
    pub allow_aliases: Option<bool>,
    pub call_to_validate: Option<bool>,
}

/// Result of extracting one definition.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub members: Vec<DeclaredMember>,
    pub options: ClassOptions,
    /// Names listed in `_ignore_`.
    pub ignored: Vec<String>,
    /// Problems that do not stop the set from building.
    pub errors: Vec<DefinitionError>,
}

impl Extraction {
    /// Turn the extraction into a build request; bases are added by the caller.
    pub fn into_request(self, name: impl Into<String>, span: Span) -> ExtensionRequest {
        let mut request = ExtensionRequest::new(name)
            .with_members(self.members)
            .extending(self.options.extend)
            .at(span);
        request.allow_aliases = self.options.allow_aliases;
        request.call_to_validate = self.options.call_to_validate;
        request
    }
}

pub struct MemberExtractor<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
}

impl<'a> MemberExtractor<'a> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        MemberExtractor { arena, interner }
    }

    pub fn classify(&self, candidate: &Candidate, ignore: &FxHashSet<String>) -> Classification {
        let name = self.interner.lookup(candidate.name);
        if name.starts_with('_') {
            return Classification::Excluded(Exclusion::Private);
        }
        if ignore.contains(name) {
            return Classification::Excluded(Exclusion::Ignored);
        }
        match evaluate_literal(self.arena, self.interner, candidate.value) {
            Ok(value) => Classification::Member(value),
            Err(NotLiteral::Float(value)) => Classification::Unsupported(value),
            Err(NotLiteral::OutOfRange) => Classification::Excluded(Exclusion::OutOfRange),
            Err(NotLiteral::Computed) => Classification::Excluded(Exclusion::Computed),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(set = %self.interner.lookup(class.name)))]
    pub fn extract(&self, class: &ClassDef) -> Extraction {
        let set = self.interner.lookup(class.name);
        let mut extraction = Extraction::default();
        self.read_options(set, class, &mut extraction);

        let candidates = extract_candidates(self.arena, class);
        let ignore = self.read_ignore(set, &candidates, &mut extraction.errors);
        extraction.ignored = ignore.iter().cloned().collect();
        extraction.ignored.sort();

        let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
        for candidate in &candidates {
            let classification = self.classify(candidate, &ignore);
            if matches!(
                classification,
                Classification::Excluded(Exclusion::Private | Exclusion::Ignored)
            ) {
                continue;
            }
            let member = self.interner.lookup(candidate.name);
            if let Some(&previous) = seen.get(&candidate.name) {
                extraction.errors.push(DefinitionError::Redefined {
                    set: set.to_owned(),
                    member: member.to_owned(),
                    span: candidate.name_span,
                    previous,
                });
                continue;
            }
            seen.insert(candidate.name, candidate.name_span);

            match classification {
                Classification::Member(value) => extraction.members.push(DeclaredMember::new(
                    LiteralMember::new(member, value),
                    candidate.name_span,
                )),
                Classification::Unsupported(value) => {
                    extraction.errors.push(DefinitionError::UnsupportedLiteral {
                        set: set.to_owned(),
                        member: member.to_owned(),
                        value: format!("{value:?}"),
                        span: self.arena.span(candidate.value),
                    });
                }
                Classification::Excluded(reason) => {
                    tracing::trace!(member, ?reason, "not a member");
                }
            }
        }
        extraction
    }

    fn read_options(&self, set: &str, class: &ClassDef, extraction: &mut Extraction) {
        for keyword in &class.keywords {
            let Some(option) = keyword.name.map(|n| self.interner.lookup(n)) else {
                continue;
            };
            let slot = match option {
                "extend" | "allow_aliases" | "call_to_validate" => option,
                _ => continue,
            };
            let value = match self.arena.kind(keyword.value) {
                ExprKind::Bool(b) => b,
                _ => {
                    extraction.errors.push(DefinitionError::InvalidOption {
                        set: set.to_owned(),
                        option: slot.to_owned(),
                        span: keyword.span,
                    });
                    continue;
                }
            };
            match slot {
                "extend" => extraction.options.extend = value,
                "allow_aliases" => extraction.options.allow_aliases = Some(value),
                _ => extraction.options.call_to_validate = Some(value),
            }
        }
    }

    /// `_ignore_ = "a b"`, `"a, b"`, `["a", "b"]`, `("a",)`, or `None`.
    fn read_ignore(
        &self,
        set: &str,
        candidates: &[Candidate],
        errors: &mut Vec<DefinitionError>,
    ) -> FxHashSet<String> {
        let mut ignore = FxHashSet::default();
        let Some(directive) = candidates
            .iter()
            .rev()
            .find(|c| self.interner.lookup(c.name) == "_ignore_")
        else {
            return ignore;
        };

        let invalid = || DefinitionError::InvalidIgnore {
            set: set.to_owned(),
            span: self.arena.span(directive.value),
        };
        match self.arena.kind(directive.value) {
            ExprKind::None => {}
            ExprKind::Str(text) => {
                ignore.extend(
                    self.interner
                        .lookup(text)
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|s| !s.is_empty())
                        .map(str::to_owned),
                );
            }
            ExprKind::List(items) | ExprKind::Tuple(items) | ExprKind::Set(items) => {
                for &item in self.arena.list(items) {
                    match self.arena.kind(item) {
                        ExprKind::Str(text) => {
                            ignore.insert(self.interner.lookup(text).to_owned());
                        }
                        _ => {
                            errors.push(invalid());
                            return FxHashSet::default();
                        }
                    }
                }
            }
            _ => errors.push(invalid()),
        }
        ignore
    }
}

#[cfg(test)]
mod tests;
