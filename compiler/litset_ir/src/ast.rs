//! Syntax tree for literal-set definition files.
//!
//! Expressions are `Copy` nodes stored in an `ExprArena`; statements own
//! their nested bodies. Every node carries the span the diagnostics point at.

use std::fmt;

use crate::{ExprId, ExprRange, Name, Span, Spanned};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Int(u64),
    /// Integer literal outside the 64-bit range.
    BigInt,
    /// Float stored as bits.
    Float(u64),
    Str(Name),
    Bytes(crate::BytesId),
    FString,
    Bool(bool),
    None,
    /// `...`
    Ellipsis,

    Name(Name),
    /// `receiver.attr`
    Attribute {
        receiver: ExprId,
        attr: Name,
        attr_span: Span,
    },
    /// `func(args)`
    Call {
        func: ExprId,
        args: CallArgRange,
    },
    /// `value[index]`; several indices are a `Tuple`.
    Subscript {
        value: ExprId,
        index: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `then_expr if cond else else_expr`
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    List(ExprRange),
    Tuple(ExprRange),
    Set(ExprRange),
    /// Keys and values interleaved.
    Dict(ExprRange),
    Lambda {
        body: ExprId,
    },

    /// Placeholder after a parse error.
    Error,
}

impl ExprKind {
    /// Literal tokens, whether or not a literal set accepts them.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::Int(_)
                | ExprKind::BigInt
                | ExprKind::Float(_)
                | ExprKind::Str(_)
                | ExprKind::Bytes(_)
                | ExprKind::Bool(_)
                | ExprKind::None
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    Invert,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    BitOr,
    BitAnd,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Is,
    IsNot,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::In => "in",
            BinaryOp::NotIn => "not in",
            BinaryOp::Is => "is",
            BinaryOp::IsNot => "is not",
        }
    }
}

/// One call argument; `name` is set for keyword arguments.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallArg {
    pub name: Option<Name>,
    pub value: ExprId,
    pub span: Span,
}

/// Range of `CallArg`s in `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct CallArgRange {
    pub start: u32,
    pub len: u16,
}

impl CallArgRange {
    pub const EMPTY: CallArgRange = CallArgRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Class(ClassDef),
    Function(Function),
    /// `a = b = value`
    Assign {
        targets: Vec<ExprId>,
        value: ExprId,
    },
    /// `target: annotation [= value]`
    AnnAssign {
        target: ExprId,
        annotation: ExprId,
        value: Option<ExprId>,
    },
    /// `type Name = value`
    TypeAlias {
        name: Name,
        name_span: Span,
        value: ExprId,
    },
    Expr(ExprId),
    Return(Option<ExprId>),
    If {
        cond: ExprId,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    For {
        target: ExprId,
        iter: ExprId,
        body: Vec<Stmt>,
    },
    While {
        cond: ExprId,
        body: Vec<Stmt>,
    },
    Import(ImportDef),
    Pass,
    /// Placeholder after a parse error.
    Error,
}

/// `class Name(bases, keywords): body`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDef {
    pub name: Name,
    pub name_span: Span,
    pub decorators: Vec<ExprId>,
    /// Positional bases in declaration order.
    pub bases: Vec<ExprId>,
    /// Class keywords such as `extend=True`.
    pub keywords: Vec<CallArg>,
    pub body: Vec<Stmt>,
}

impl ClassDef {
    pub fn keyword(&self, name: Name) -> Option<&CallArg> {
        self.keywords.iter().find(|k| k.name == Some(name))
    }
}

/// `def name(params) -> returns: body`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Function {
    pub name: Name,
    pub name_span: Span,
    pub decorators: Vec<ExprId>,
    pub params: Vec<Param>,
    pub returns: Option<ExprId>,
    pub body: Vec<Stmt>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParamKind {
    Regular,
    /// `*args`
    VarArgs,
    /// `**kwargs`
    KwArgs,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub span: Span,
    pub kind: ParamKind,
    pub annotation: Option<ExprId>,
    pub default: Option<ExprId>,
}

/// `import a.b [as c]` or `from a.b import x [as y], ...`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportDef {
    pub module: Vec<Name>,
    /// `(imported, alias)`; empty for a plain `import`.
    pub names: Vec<(Name, Option<Name>)>,
    /// Alias for a plain `import a.b as c`.
    pub alias: Option<Name>,
}

/// A parsed file.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Module {
    pub body: Vec<Stmt>,
}
