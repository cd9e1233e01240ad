//! Litset IR
//!
//! Core data structures shared by every analysis phase:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - A flat syntax tree (statements own their bodies, expressions live
//!   in an `ExprArena` and are addressed by `ExprId`)
//! - `LiteralValue` and `TypeTag`, the scalar values a literal set holds
//!
//! Floats inside tokens and expressions are stored as `u64` bits so every
//! node can derive `Eq` and `Hash`.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod literal;
mod name;
mod span;
pub mod stack;
mod token;

pub use arena::{BytesId, ExprArena};
pub use ast::{
    BinaryOp, CallArg, CallArgRange, ClassDef, Expr, ExprKind, Function, ImportDef, Module,
    Param, ParamKind, Stmt, StmtKind, UnaryOp,
};
pub use expr_id::{ExprId, ExprRange};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use literal::{LiteralValue, TypeTag};
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};

/// Anything with a source location.
pub trait Spanned {
    fn span(&self) -> Span;
}
