//! Token cursor.

use litset_diagnostic::{unexpected_token, Diagnostic};
use litset_ir::{Name, Span, Token, TokenKind, TokenList};

/// Position in a token stream whose last token is always `Eof`.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

const EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens: tokens.as_slice(),
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(EOF)
    }

    #[inline]
    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn span(&self) -> Span {
        self.current().span
    }

    /// Kind `n` tokens ahead of the current one.
    pub(crate) fn peek(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn check_ident(&self) -> bool {
        matches!(self.kind(), TokenKind::Ident(_))
    }

    /// Move past the current token, never past `Eof`.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Span, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(unexpected_token(
                self.span(),
                kind.display_name(),
                self.kind().display_name(),
            ))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(Name, Span), Diagnostic> {
        match self.kind() {
            TokenKind::Ident(name) => Ok((name, self.advance().span)),
            other => Err(litset_diagnostic::expected_identifier(
                self.span(),
                other.display_name(),
            )),
        }
    }
}
