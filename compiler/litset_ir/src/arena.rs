//! Contiguous storage for expressions.

use crate::ast::{CallArg, CallArgRange, Expr, ExprKind};
use crate::{ExprId, ExprRange, Span};

/// Index of a byte-string payload in an `ExprArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BytesId(u32);

/// Owns every expression of one parsed file.
///
/// Lists (tuple/list elements, call arguments) are stored in side tables so
/// `Expr` stays `Copy`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    call_args: Vec<CallArg>,
    bytes: Vec<Vec<u8>>,
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_kind(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.alloc(Expr::new(kind, span))
    }

    /// Store an element list. Lists longer than `u16::MAX` are truncated.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.expr_lists.len());
        self.expr_lists.extend(ids);
        let len = to_u16(self.expr_lists.len() - start as usize);
        ExprRange::new(start, len)
    }

    pub fn alloc_args(&mut self, args: impl IntoIterator<Item = CallArg>) -> CallArgRange {
        let start = to_u32(self.call_args.len());
        self.call_args.extend(args);
        let len = to_u16(self.call_args.len() - start as usize);
        CallArgRange { start, len }
    }

    pub fn alloc_bytes(&mut self, bytes: Vec<u8>) -> BytesId {
        let id = BytesId(to_u32(self.bytes.len()));
        self.bytes.push(bytes);
        id
    }

    /// The expression behind `id`, or an `Error` node for a stale id.
    #[inline]
    pub fn get(&self, id: ExprId) -> Expr {
        self.exprs
            .get(id.index())
            .copied()
            .unwrap_or(Expr::new(ExprKind::Error, Span::DUMMY))
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.get(id).kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.get(id).span
    }

    pub fn list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        self.expr_lists
            .get(start..start + range.len())
            .unwrap_or(&[])
    }

    pub fn args(&self, range: CallArgRange) -> &[CallArg] {
        let start = range.start as usize;
        self.call_args.get(start..start + range.len()).unwrap_or(&[])
    }

    pub fn bytes(&self, id: BytesId) -> &[u8] {
        self.bytes.get(id.0 as usize).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Elements of a tuple subscript, or the single index otherwise.
    ///
    /// `Optional[X]` and `Union[X, Y]` share this shape.
    pub fn subscript_items(&self, index: ExprId) -> Vec<ExprId> {
        match self.kind(index) {
            ExprKind::Tuple(range) => self.list(range).to_vec(),
            _ => vec![index],
        }
    }

    /// Dotted name of a `Name`/`Attribute` chain, outermost last.
    pub fn dotted_path(&self, id: ExprId) -> Option<Vec<crate::Name>> {
        match self.kind(id) {
            ExprKind::Name(name) => Some(vec![name]),
            ExprKind::Attribute { receiver, attr, .. } => {
                let mut path = self.dotted_path(receiver)?;
                path.push(attr);
                Some(path)
            }
            _ => None,
        }
    }
}
