//! Recursive descent parser for literal-set definition files.
//!
//! Produces a `Module` whose expressions live in an `ExprArena`. Errors are
//! collected rather than returned: a failed statement is replaced by
//! `StmtKind::Error` and parsing resumes at the next line, so one typo does
//! not hide the rest of the file's sets.

mod cursor;
mod expr;
mod stmt;

use litset_diagnostic::Diagnostic;
use litset_ir::{ExprArena, ExprId, Module, Span, StringInterner, TokenKind, TokenList};

use cursor::Cursor;

/// Parser output.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub module: Module,
    pub arena: ExprArena,
    /// Lexer and parser diagnostics, in source order.
    pub errors: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Diagnostic::is_error)
    }
}

/// Lex and parse a whole file.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_source(source: &str, interner: &StringInterner) -> ParseOutput {
    let lexed = litset_lexer::lex(source, interner);
    let mut output = parse(&lexed.tokens, interner);
    let mut errors = lexed.errors;
    errors.append(&mut output.errors);
    errors.sort_by_key(|d| d.primary_span().map_or(0, |s| s.start));
    output.errors = errors;
    output
}

/// Parse an already lexed token stream.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseOutput {
    let mut parser = Parser::new(tokens, interner, ExprArena::new());
    let body = parser.parse_module();
    ParseOutput {
        module: Module { body },
        arena: parser.arena,
        errors: parser.errors,
    }
}

/// Parse a single expression from `source` into an existing arena.
///
/// Used for string annotations (`x: "HttpMethod"`): `base` is the byte
/// offset of the string contents in the enclosing file, and every span of
/// the new nodes and diagnostics is shifted by it.
pub fn parse_expression_into(
    source: &str,
    base: u32,
    interner: &StringInterner,
    arena: &mut ExprArena,
) -> Result<ExprId, Vec<Diagnostic>> {
    let lexed = litset_lexer::lex(source.trim(), interner);
    let leading = u32::try_from(source.len() - source.trim_start().len()).unwrap_or(0);
    let base = base + leading;
    if !lexed.errors.is_empty() {
        return Err(lexed.errors.into_iter().map(|d| d.offset_spans(base)).collect());
    }

    let mut parser = Parser::new(&lexed.tokens, interner, std::mem::take(arena));
    parser.span_base = base;
    let result = parser.parse_expr().and_then(|id| {
        parser.cursor.eat(TokenKind::Newline);
        if parser.cursor.is_at_end() {
            Ok(id)
        } else {
            Err(litset_diagnostic::unexpected_token(
                parser.cursor.span(),
                "end of expression",
                parser.cursor.kind().display_name(),
            ))
        }
    });
    *arena = parser.arena;
    result.map_err(|d| vec![d.offset_spans(base)])
}

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    arena: ExprArena,
    errors: Vec<Diagnostic>,
    /// Added to every node span; nonzero only for embedded expressions.
    span_base: u32,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a TokenList, interner: &'a StringInterner, arena: ExprArena) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            tokens,
            interner,
            arena,
            errors: Vec::new(),
            span_base: 0,
        }
    }

    /// Span adjusted into the enclosing file.
    #[inline]
    fn at(&self, span: Span) -> Span {
        span.offset_by(self.span_base)
    }
}
