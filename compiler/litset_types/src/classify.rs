//! Value-position / type-position classification.
//!
//! The classifier walks one annotation or one runtime expression and
//! reports every name-like occurrence (a `Name` or dotted `Attribute`
//! chain) together with the position it sits in and the wrappers it is
//! nested under. It does not know which names denote literal sets; the
//! host resolves each occurrence's dotted path and only then asks the
//! [`TypeResolver`](crate::TypeResolver) for a type.
//!
//! String annotations cannot be placed without parsing their contents, so
//! they come back as [`Classified::Deferred`] and are re-classified once
//! the host has parsed them.

use litset_ir::stack::ensure_sufficient_stack;
use litset_ir::{BinaryOp, ExprArena, ExprId, ExprKind, Name, Span, StringInterner};
use smallvec::SmallVec;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Position {
    /// Evaluated at runtime: the set is a namespace object.
    Value,
    /// Read as a type: the set is the union of its values.
    Type,
}

/// The syntactic slot an expression fills.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Site {
    Parameter,
    Return,
    /// `x: T` or `x: T = v`
    Variable,
    /// `type X = T` or `X: TypeAlias = T`
    TypeAlias,
    /// First argument of `cast(T, v)`.
    Cast,
    /// Anything evaluated at runtime.
    Expression,
}

impl Site {
    pub const fn is_annotation(self) -> bool {
        !matches!(self, Site::Expression)
    }
}

/// A recognized type form an occurrence is nested under.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Wrapper {
    /// `Optional[...]`
    Optional,
    /// `Union[...]` or `A | B`
    Union,
    /// `list[...]`, `dict[...]`, `tuple[...]`, and other subscripted names.
    Container,
    /// First argument of `Annotated[...]`.
    Annotated,
    /// `Final[...]`, `ClassVar[...]`, `Required[...]` and similar.
    Qualifier,
    /// `type[...]`
    ClassOf,
}

/// Where one occurrence sits. Rebuilt for every occurrence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolutionContext {
    pub site: Site,
    pub position: Position,
    /// Outermost first.
    pub nesting: SmallVec<[Wrapper; 4]>,
}

impl ResolutionContext {
    pub fn value() -> Self {
        ResolutionContext {
            site: Site::Expression,
            position: Position::Value,
            nesting: SmallVec::new(),
        }
    }

    pub fn annotation(site: Site) -> Self {
        ResolutionContext {
            site,
            position: ContextClassifier::classify(site),
            nesting: SmallVec::new(),
        }
    }

    pub fn is_type(&self) -> bool {
        self.position == Position::Type
    }

    /// Innermost wrapper.
    pub fn innermost(&self) -> Option<Wrapper> {
        self.nesting.last().copied()
    }
}

/// How a value-position occurrence is used by its parent expression.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Role {
    Plain,
    /// The function of a call; `call` is the `Call` node.
    Callee { call: ExprId },
    /// Class argument of `isinstance`/`issubclass`.
    InstanceCheck { call: ExprId },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Occurrence {
    /// A `Name` or dotted `Attribute` node.
    pub expr: ExprId,
    pub span: Span,
    pub role: Role,
    pub context: ResolutionContext,
}

/// A string annotation whose contents have not been parsed yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForwardRef {
    /// The `Str` node.
    pub expr: ExprId,
    pub text: Name,
    /// Span of the whole string literal, quotes included.
    pub span: Span,
    pub site: Site,
    pub nesting: SmallVec<[Wrapper; 4]>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Classified {
    Occurrence(Occurrence),
    Deferred(ForwardRef),
}

impl Classified {
    pub fn as_occurrence(&self) -> Option<&Occurrence> {
        match self {
            Classified::Occurrence(o) => Some(o),
            Classified::Deferred(_) => None,
        }
    }
}

/// Walks expressions and classifies the name-like occurrences in them.
pub struct ContextClassifier<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
}

struct Walk {
    site: Site,
    nesting: SmallVec<[Wrapper; 4]>,
    out: Vec<Classified>,
}

impl Walk {
    fn context(&self, position: Position) -> ResolutionContext {
        ResolutionContext {
            site: self.site,
            position,
            nesting: self.nesting.clone(),
        }
    }
}

impl<'a> ContextClassifier<'a> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        ContextClassifier { arena, interner }
    }

    /// Verdict for an occurrence at `site`.
    ///
    /// Annotation sites are type positions, and the walk keeps the site
    /// while it descends through wrappers, so `Optional[Set]` and
    /// `list[A | B]` classify their operands as types too. Everything
    /// else is a value position.
    pub fn classify(site: Site) -> Position {
        if site.is_annotation() {
            Position::Type
        } else {
            Position::Value
        }
    }

    /// Occurrences inside an annotation (or alias value, or cast target).
    pub fn annotation(&self, expr: ExprId, site: Site) -> Vec<Classified> {
        let mut walk = Walk {
            site,
            nesting: SmallVec::new(),
            out: Vec::new(),
        };
        self.walk_type(expr, &mut walk);
        walk.out
    }

    /// Occurrences inside a runtime expression.
    pub fn expression(&self, expr: ExprId) -> Vec<Classified> {
        let mut walk = Walk {
            site: Site::Expression,
            nesting: SmallVec::new(),
            out: Vec::new(),
        };
        self.walk_value(expr, Role::Plain, &mut walk);
        walk.out
    }

    /// Occurrences inside the parsed contents of a forward reference,
    /// classified as if they had been written in its place.
    pub fn forward_ref(&self, reference: &ForwardRef, parsed: ExprId) -> Vec<Classified> {
        let mut walk = Walk {
            site: reference.site,
            nesting: reference.nesting.clone(),
            out: Vec::new(),
        };
        self.walk_type(parsed, &mut walk);
        walk.out
    }

    fn last_segment(&self, expr: ExprId) -> Option<&'a str> {
        match self.arena.kind(expr) {
            ExprKind::Name(name) | ExprKind::Attribute { attr: name, .. } => {
                Some(self.interner.lookup(name))
            }
            _ => None,
        }
    }

    fn is_dotted(&self, expr: ExprId) -> bool {
        self.arena.dotted_path(expr).is_some()
    }

    fn push_occurrence(&self, expr: ExprId, role: Role, position: Position, walk: &mut Walk) {
        let context = walk.context(position);
        tracing::trace!(
            segment = self.last_segment(expr).unwrap_or(""),
            ?position,
            ?role,
            depth = context.nesting.len(),
            "classified occurrence"
        );
        walk.out.push(Classified::Occurrence(Occurrence {
            expr,
            span: self.arena.span(expr),
            role,
            context,
        }));
    }

    fn nested(&self, wrapper: Wrapper, items: &[ExprId], walk: &mut Walk) {
        walk.nesting.push(wrapper);
        for &item in items {
            self.walk_type(item, walk);
        }
        walk.nesting.pop();
    }

    fn walk_type(&self, expr: ExprId, walk: &mut Walk) {
        ensure_sufficient_stack(|| self.walk_type_inner(expr, walk));
    }

    fn walk_type_inner(&self, expr: ExprId, walk: &mut Walk) {
        match self.arena.kind(expr) {
            ExprKind::Name(_) => {
                self.push_occurrence(expr, Role::Plain, Self::classify(walk.site), walk);
            }
            ExprKind::Attribute { receiver, .. } => {
                if self.is_dotted(expr) {
                    self.push_occurrence(expr, Role::Plain, Self::classify(walk.site), walk);
                } else {
                    self.walk_value(receiver, Role::Plain, walk);
                }
            }
            ExprKind::Subscript { value, index } => self.walk_subscript(value, index, walk),
            ExprKind::Binary {
                op: BinaryOp::BitOr,
                left,
                right,
            } => self.nested(Wrapper::Union, &[left, right], walk),
            ExprKind::Str(text) => {
                tracing::trace!(text = self.interner.lookup(text), "deferred forward reference");
                walk.out.push(Classified::Deferred(ForwardRef {
                    expr,
                    text,
                    span: self.arena.span(expr),
                    site: walk.site,
                    nesting: walk.nesting.clone(),
                }));
            }
            ExprKind::List(range) | ExprKind::Tuple(range) => {
                for &item in self.arena.list(range) {
                    self.walk_type(item, walk);
                }
            }
            ExprKind::None | ExprKind::Ellipsis | ExprKind::Error => {}
            _ => self.walk_value(expr, Role::Plain, walk),
        }
    }

    fn walk_subscript(&self, value: ExprId, index: ExprId, walk: &mut Walk) {
        let items = self.arena.subscript_items(index);
        match self.last_segment(value) {
            // Arguments of `Literal[...]` are values, never names of types.
            Some("Literal") => {}
            Some("Optional") => self.nested(Wrapper::Optional, &items, walk),
            Some("Union") => self.nested(Wrapper::Union, &items, walk),
            Some("Annotated") => {
                if let Some((&first, metadata)) = items.split_first() {
                    self.nested(Wrapper::Annotated, &[first], walk);
                    for &meta in metadata {
                        self.walk_value(meta, Role::Plain, walk);
                    }
                }
            }
            Some("Final" | "ClassVar" | "Required" | "NotRequired" | "ReadOnly" | "TypeGuard") => {
                self.nested(Wrapper::Qualifier, &items, walk);
            }
            Some("type" | "Type") => self.nested(Wrapper::ClassOf, &items, walk),
            _ => {
                self.walk_type(value, walk);
                self.nested(Wrapper::Container, &items, walk);
            }
        }
    }

    fn walk_value(&self, expr: ExprId, role: Role, walk: &mut Walk) {
        ensure_sufficient_stack(|| self.walk_value_inner(expr, role, walk));
    }

    fn walk_value_inner(&self, expr: ExprId, role: Role, walk: &mut Walk) {
        match self.arena.kind(expr) {
            ExprKind::Name(_) => self.push_occurrence(expr, role, Position::Value, walk),
            ExprKind::Attribute { receiver, .. } => {
                if self.is_dotted(expr) {
                    self.push_occurrence(expr, role, Position::Value, walk);
                } else {
                    self.walk_value(receiver, Role::Plain, walk);
                }
            }
            ExprKind::Call { func, args } => self.walk_call(expr, func, args, walk),
            ExprKind::Subscript { value, index } => {
                self.walk_value(value, Role::Plain, walk);
                self.walk_value(index, Role::Plain, walk);
            }
            ExprKind::Unary { operand, .. } => self.walk_value(operand, Role::Plain, walk),
            ExprKind::Binary { left, right, .. } => {
                self.walk_value(left, Role::Plain, walk);
                self.walk_value(right, Role::Plain, walk);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                for e in [cond, then_expr, else_expr] {
                    self.walk_value(e, Role::Plain, walk);
                }
            }
            ExprKind::List(range)
            | ExprKind::Tuple(range)
            | ExprKind::Set(range)
            | ExprKind::Dict(range) => {
                for &item in self.arena.list(range) {
                    self.walk_value(item, Role::Plain, walk);
                }
            }
            ExprKind::Lambda { body } => self.walk_value(body, Role::Plain, walk),
            ExprKind::Int(_)
            | ExprKind::BigInt
            | ExprKind::Float(_)
            | ExprKind::Str(_)
            | ExprKind::Bytes(_)
            | ExprKind::FString
            | ExprKind::Bool(_)
            | ExprKind::None
            | ExprKind::Ellipsis
            | ExprKind::Error => {}
        }
    }

    fn walk_call(
        &self,
        call: ExprId,
        func: ExprId,
        args: litset_ir::CallArgRange,
        walk: &mut Walk,
    ) {
        let args = self.arena.args(args);
        let callee = match self.arena.kind(func) {
            ExprKind::Name(name) => Some(self.interner.lookup(name)),
            _ => None,
        };
        match callee {
            Some("isinstance" | "issubclass") if args.len() == 2 => {
                self.walk_value(args[0].value, Role::Plain, walk);
                let class_arg = args[1].value;
                let classes = match self.arena.kind(class_arg) {
                    ExprKind::Tuple(range) => self.arena.list(range).to_vec(),
                    _ => vec![class_arg],
                };
                for class in classes {
                    let role = if self.is_dotted(class) {
                        Role::InstanceCheck { call }
                    } else {
                        Role::Plain
                    };
                    self.walk_value(class, role, walk);
                }
            }
            Some("cast") if !args.is_empty() => {
                let saved = std::mem::replace(&mut walk.site, Site::Cast);
                self.walk_type(args[0].value, walk);
                walk.site = saved;
                for arg in &args[1..] {
                    self.walk_value(arg.value, Role::Plain, walk);
                }
            }
            _ => {
                if self.is_dotted(func) {
                    self.walk_value(func, Role::Callee { call }, walk);
                } else {
                    self.walk_value(func, Role::Plain, walk);
                }
                for arg in args {
                    self.walk_value(arg.value, Role::Plain, walk);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
